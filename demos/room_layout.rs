//! Example: Grow rooms on a single random diagram

use voronoi_level_layout::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("Room Layout Example");
    println!("===================\n");

    let config = RoomLayoutConfig {
        room_count: 3,
        room_size: 5,
        relaxation: Some(LloydOptions {
            max_iterations: 3,
            convergence_threshold: 0.001,
        }),
        ..RoomLayoutConfig::default()
    };

    println!("Configuration:");
    println!("  Bounds: {} x {}", config.width, config.height);
    println!("  Sites: {} (seed \"{}\")", config.site_count, config.seed);
    println!("  Rooms: {} of {} cells", config.room_count, config.room_size);
    println!();

    let layout = generate_room_layout(&config)?;

    for room in 0..config.room_count {
        println!("Room {}:", room);
        for piece in layout.room_pieces(room) {
            let first = piece.polygon[0];
            println!(
                "  {} vertices, first at ({:.1}, {:.1})",
                piece.polygon.len(),
                first.x,
                first.y
            );
        }
    }

    // Diagram-level queries on the same site set
    let bounds = Rect::from_size(config.width, config.height);
    let sites = generation::generate_sites_seeded(config.site_count, bounds, &config.seed);
    let diagram = VoronoiDiagram::build(&sites, bounds)?;

    println!("\nDiagram:");
    println!("  Voronoi edges: {}", diagram.voronoi_edges().len());
    println!("  Delaunay edges: {}", diagram.delaunay_edges().len());
    println!("  Spanning tree edges: {}", diagram.spanning_tree().len());

    let center = Vec2::new(config.width / 2.0, config.height / 2.0);
    println!("  Sites within 100 of center: {}", diagram.sites_in_radius(center, 100.0).len());
    println!("  Cell at center: {}", diagram.find_site_at(center));

    Ok(())
}
