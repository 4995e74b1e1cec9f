use grid_util::point::Point;
use tile_route::level::level_from_json;
use tile_route::{
    build_steps, Choreographer, Config, GridSolver, GridTopology, PathFinder, PlaybackEvent,
};

// In this example a route is found on the 11x11 grid with a wall shaped like
//  ...........
//  ...........
//  ....#######
//  ...........
// and then played back step by step. S is (0, 5), G is (4, 8).

const LEVEL: &str = r#"["2,4","2,5","2,6","2,7","2,8","2,9","2,10"]"#;

fn main() -> tile_route::Result<()> {
    let config = Config::from_toml_str("[playback]\nstep_duration_ms = 50")?;
    let mut grid = GridTopology::with_config(&config.grid);
    grid.initialize();
    let empty = grid.load_level(&level_from_json(LEVEL)?)?;
    println!("{} empty tiles", empty.len());
    println!("{}", grid);

    let mode = config.search.movement_mode;
    let route = PathFinder::new().find_route(&grid, Point::new(0, 5), Point::new(4, 8), mode)?;
    println!("Route with cost {} under {:?}:", route.cost, mode);

    let mut choreographer = Choreographer::new(&config.playback);
    let events = choreographer.play(build_steps(&route)?)?;
    for event in events.iter() {
        match event {
            PlaybackEvent::Arrived { index, tile } => println!("step {index}: {tile}"),
            PlaybackEvent::Finished => println!("arrived"),
            PlaybackEvent::Cancelled => println!("cancelled"),
        }
    }
    choreographer.wait();
    Ok(())
}
