use ctlcenter::display::{render, status_lines};
use ctlcenter::utils::command::check_all_commands;
use log::info;
use std::time::Instant;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let started = Instant::now();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-v" || a == "--version") {
        println!("ctlcenter version {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let (settings, center) = ctlcenter::detect();

    if args.iter().any(|a| a == "-d" || a == "--debug") {
        let commands = settings.commands.all();
        check_all_commands(center.shell(), commands.iter().map(|(_, cmd)| *cmd), true);
    }

    let snapshot = center.snapshot();
    let lines = status_lines(&snapshot, &settings.icons, center.brightness_scheme());
    println!("{}", render(&lines, ": "));

    info!("Ready in {} ms", started.elapsed().as_millis());
}
