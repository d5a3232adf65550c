//! Complete workflow demonstration for voronoi_level_layout

use voronoi_level_layout::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== voronoi_level_layout Level Demo ===\n");

    // Step 1: Configure level
    println!("Step 1: Configuring level...");
    let config = LevelConfigBuilder::new()
        .seed_str("lelele")
        .challenge_count(3)
        .exploration_count(2)
        .connectivity(Connectivity::BoundedDegree { max_degree: 3 })?
        .neighborhood(Neighborhood::Eight)
        .sites_per_tile(5)?
        .lloyd_iterations(1)?
        .build()?;

    println!("  Seed: {}", config.seed);
    println!(
        "  Mission: {} challenges, {} explorations, {:?}",
        config.mission.challenge_count, config.mission.exploration_count, config.mission.connectivity
    );
    println!(
        "  Tiles: {} units, {} sites each",
        config.placement.tile_size, config.placement.sites_per_tile
    );

    // Step 2: Generate level
    println!("\nStep 2: Generating level...");
    let level = LevelGenerator::new(config)?.generate()?;
    println!("  Succeeded on attempt {} (seed {})", level.attempt() + 1, level.seed());

    // Step 3: Mission graph
    println!("\nStep 3: Mission graph:");
    for line in level.graph().to_string().lines() {
        println!("  {}", line);
    }

    // Step 4: Placement
    println!("\nStep 4: Placement:");
    let placement = level.placement();
    for room in placement.mission_rooms() {
        if let Some((id, node)) = &room.mission {
            println!("  node {:>2} at tile ({}, {}): {}", id, room.tile.x, room.tile.y, node);
        }
    }
    println!("  {} filler rooms, {} backtracks", placement.filler_rooms().len(), placement.backtracks());
    println!("  Diagram: {} cells", level.diagram().site_count());

    // Step 5: Layout
    println!("\nStep 5: Layout:");
    let layout = level.layout();
    println!("  {} pieces, {} corridor cells", layout.len(), layout.corridor_count());
    let vertices: usize = layout.polygons().map(|p| p.len()).sum();
    println!("  {} vertices total", vertices);

    println!("\n=== Demo Complete ===");

    Ok(())
}
