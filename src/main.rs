use std::env;
use std::process;

use fretgate::{start_session, Chart, ClockMode, Session, Transition};
use log::info;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: fretgate <chart.yaml>");
        eprintln!("       fretgate --autoplay <chart.yaml>");
        process::exit(1);
    }

    let mut autoplay = false;
    let mut input_path = &args[1];

    // Parse flags
    if args[1] == "--autoplay" {
        autoplay = true;
        if args.len() < 3 {
            eprintln!("Usage: fretgate --autoplay <chart.yaml>");
            process::exit(1);
        }
        input_path = &args[2];
    }

    let chart = match Chart::load(input_path) {
        Ok(chart) => chart,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut session = match start_session(&chart, ClockMode::Ticks) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    info!("Generated {} target(s) from {}", session.targets().len(), input_path);

    print_yaml(session.targets());

    if autoplay {
        play_on_time(&mut session);
        println!("---");
        print_yaml(&session.summary());
    }
}

/// Drive the session as a player hitting every target exactly on its tick.
fn play_on_time(session: &mut Session) {
    let threshold = session.options().approach_threshold_ticks as i64;
    while !session.is_finished() {
        let Some(tick) = session.active_target().map(|t| t.tick) else {
            let tick = session.state().current_tick;
            let now = session.tempo().tick_to_seconds(tick);
            if session.advance(now, tick, false) == Transition::None {
                break;
            }
            continue;
        };
        let approach = tick - threshold;

        let now = session.tempo().tick_to_seconds(approach);
        session.advance(now, approach.max(session.state().current_tick), false);
        let now = session.tempo().tick_to_seconds(tick);
        session.advance(now, tick, true);
    }
}

fn print_yaml<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_yaml::to_string(value) {
        Ok(yaml) => print!("{}", yaml),
        Err(e) => {
            eprintln!("Error writing output: {}", e);
            process::exit(1);
        }
    }
}
