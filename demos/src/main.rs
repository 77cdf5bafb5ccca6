//! Headless patrol simulation.
//!
//! Generates a seeded cave, scatters patrol waypoints on it, and runs a
//! guard through its state machine for a number of ticks, then prints the
//! map, the route and the diagnostics journal.
//!
//! Usage: `wayfind-demo [seed] [ticks]`

mod cave;

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use wayfind_agents::{Actor, Agent, AgentWorld};
use wayfind_core::{Cell, Diagnostics, NavConfig, Vec2};
use wayfind_paths::NavigationMap;

const WIDTH: i32 = 48;
const HEIGHT: i32 = 18;
const FILL: f64 = 0.45;
const WAYPOINTS: usize = 4;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(1);
    let ticks: usize = args.next().map(|s| s.parse::<usize>()).transpose()?.unwrap_or(400);

    let mut rng = StdRng::seed_from_u64(seed);
    let map = cave::random_walk_cave(WIDTH, HEIGHT, FILL, &mut rng);
    let mut floor = cave::floor_cells(&map);
    if floor.len() <= WAYPOINTS {
        return Err(format!("seed {seed} produced a cave with {} floor cells", floor.len()).into());
    }
    floor.shuffle(&mut rng);
    let waypoints: Vec<Cell> = floor[..WAYPOINTS].to_vec();
    let start = floor[WAYPOINTS];

    let diag = Diagnostics::new();
    let nav = NavigationMap::new(map, NavConfig::default(), diag.clone());
    let mut world = AgentWorld::new(Actor::new("guard", Vec2::ZERO).with_speed(0.5), nav);
    world.place_actor(start);

    let (mut agent, _) = Agent::patroller(world, waypoints.clone())?;
    let mut visited = HashSet::new();
    for _ in 0..ticks {
        agent.tick();
        visited.insert(agent.world().actor_cell());
    }

    let world = agent.world_mut();
    let route = world.nav.cyclic_route(&waypoints).ok();
    let actor = world.actor_cell();
    println!("seed {seed}, {ticks} ticks, start {start}, now {actor}");
    println!("state: {}", agent.state_name().unwrap_or("(none)"));
    println!();
    print_map(&agent, &waypoints, &visited, actor);
    if let Some(route) = route {
        println!();
        println!("patrol route: {} cells, {}", route.path().len(), route.path());
    }

    println!();
    for report in diag.drain() {
        println!("{report}");
    }
    Ok(())
}

fn print_map(agent: &Agent, waypoints: &[Cell], visited: &HashSet<Cell>, actor: Cell) {
    let ascii = agent.world().nav.grid().to_ascii();
    for (y, line) in ascii.lines().enumerate() {
        let row: String = line
            .chars()
            .enumerate()
            .map(|(x, ch)| {
                let c = Cell::new(x as i32, y as i32);
                if c == actor {
                    '@'
                } else if waypoints.contains(&c) {
                    'W'
                } else if visited.contains(&c) {
                    '*'
                } else {
                    ch
                }
            })
            .collect();
        println!("{row}");
    }
}
