//! Mesh generation demonstration

use voronoi_level_layout::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("Mesh Generation Demo");
    println!("====================\n");

    let config = LevelConfigBuilder::new()
        .seed(42)
        .challenge_count(2)
        .exploration_count(2)
        .build()?;

    let level = LevelGenerator::new(config)?.generate()?;
    let layout = level.layout();
    println!("Level: {} pieces", layout.len());

    // Mesh with default colors
    let mesh = generate_mesh(layout, &FanTriangulator, &BasicColorMapper)?;
    println!("\nBasic colors:");
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());

    // Memory estimate
    let mem = (mesh.positions.len() * 12 + mesh.normals.len() * 12 + mesh.colors.len() * 16 + mesh.indices.len() * 4)
        as f32
        / 1024.0;
    println!("  Memory: {:.2} KB", mem);

    // Mesh with custom colors
    let custom = CustomColorMapper {
        goal: [1.0, 0.0, 1.0, 1.0],
        ..Default::default()
    };
    let custom_mesh = generate_mesh(layout, &FanTriangulator, &custom)?;
    let magenta = custom_mesh.colors.iter().filter(|c| **c == [1.0, 0.0, 1.0, 1.0]).count();
    println!("\nCustom colors:");
    println!("  Goal vertices: {}", magenta);

    Ok(())
}
