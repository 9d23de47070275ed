//! Example: Generate a fantasy world map
//!
//! Run with `RUST_LOG=fantasy_world_map=debug` to see each pipeline stage.

use fantasy_world_map::*;
use tracing_subscriber::EnvFilter;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fantasy_world_map=info".parse()?))
        .init();

    println!("Fantasy World Generation Example");
    println!("================================\n");

    let config = WorldConfigBuilder::new()
        .seed(42)
        .map_size(MapSize::Standard)?
        .land_percent(70.0)?
        .build()?;

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Map Size: {} ({}x{})", config.map_size.name(), config.width(), config.height());
    println!("  Land: {}%", config.land_percent);
    println!("  Neighbour distance: {} ({:?} rule)", config.neighbor_distance, config.neighbor_rule);
    println!();

    let world = WorldGenerator::new(config).generate(25)?;

    println!("Landmasses:");
    for (i, landmass) in world.landmasses().iter().enumerate() {
        println!(
            "  #{:<2} {:<12} area={:>8.0} countries={} coast={:.2}",
            i,
            landmass.terrain.name(),
            landmass.polygon_area(),
            landmass.countries.len(),
            landmass.stats.coastline_ratio
        );
    }
    println!();

    println!("Countries:");
    for country in world.countries() {
        println!(
            "  {:<20} {:<12} pop={:>11} area={:>8.0} at ({:.0}, {:.0}) borders: {}",
            country.name,
            country.terrain.name(),
            country.population,
            country.area,
            country.position.x,
            country.position.y,
            world.neighbor_names(country.id).join(", ")
        );
    }
    println!();

    let stats = world.statistics();
    println!("Statistics:");
    println!("  Countries: {}", stats.total_countries);
    println!("  Population: {}", stats.total_population);
    println!("  Land area: {:.0}", stats.total_area);
    println!("  Density: {:.2} per unit", stats.average_density);
    if let Some(terrain) = stats.most_common_terrain {
        println!("  Most common terrain: {}", terrain);
    }

    let centre = DVec2::new(config.width() as f64 / 2.0, config.height() as f64 / 2.0);
    match world.find_country_at(centre).and_then(|id| world.country_by_id(id)) {
        Some(country) => println!("\nThe map centre lies in {}", country.name),
        None => println!("\nThe map centre is open sea"),
    }

    Ok(())
}
