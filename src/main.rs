//! memsim - Clock page replacement and segmentation simulators
//!
//! Usage:
//!   memsim clock [-f FRAMES] [-o OUTPUT] [-v] [TRACE]
//!   memsim segment [-m SIZE] [-v] [SCRIPT]
//!
//! Without TRACE/SCRIPT the simulator reads requests from stdin, one per
//! line, and redraws its state after each one.

use std::io::{self, BufRead, Write};
use std::process;

use clap::{Arg, ArgMatches, Command as App};

use memsim::clock::ClockReplacer;
use memsim::constants::*;
use memsim::io::{
    parse_capacity, parse_command, read_page_references, read_script, render_frames, render_memory,
    render_stats, write_outcomes, Command,
};
use memsim::logger;
use memsim::segmentation::SegmentAllocator;
use memsim::shell::{execute, handle_page_request};

/// Options for the Clock simulator
struct ClockConfig {
    frames: Option<usize>,
    trace_file: Option<String>,
    output_file: Option<String>,
}

/// Options for the segmentation simulator
struct SegmentConfig {
    memory_size: usize,
    script_file: Option<String>,
}

enum Config {
    Clock(ClockConfig),
    Segment(SegmentConfig),
}

fn main() {
    let matches = build_cli().get_matches();

    let verbose = matches
        .subcommand()
        .map_or(false, |(_, sub)| sub.is_present("verbose"));
    logger::init(verbose);

    let config = match parse_args(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let result = match &config {
        Config::Clock(c) => run_clock(c),
        Config::Segment(c) => run_segment(c),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn verbose_arg() -> Arg<'static> {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help("Log every scan step and placement decision")
}

fn build_cli() -> App<'static> {
    App::new("memsim")
        .about("Teaching simulators for Clock page replacement and dynamic segmentation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            App::new("clock")
                .about("Clock (second-chance) page replacement")
                .arg(
                    Arg::new("frames")
                        .short('f')
                        .long("frames")
                        .takes_value(true)
                        .help("Number of frames; prompted for when omitted"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .takes_value(true)
                        .requires("trace")
                        .help("Write one outcome per line to this file"),
                )
                .arg(verbose_arg())
                .arg(
                    Arg::new("trace")
                        .index(1)
                        .help("File of whitespace-separated page numbers to replay"),
                ),
        )
        .subcommand(
            App::new("segment")
                .about("Segmentation with First/Best/Worst-Fit, manual placement and compaction")
                .arg(
                    Arg::new("memory")
                        .short('m')
                        .long("memory")
                        .takes_value(true)
                        .help("Size of the address space (default 5000)"),
                )
                .arg(verbose_arg())
                .arg(
                    Arg::new("script")
                        .index(1)
                        .help("File of commands to run instead of reading stdin"),
                ),
        )
}

fn parse_args(matches: &ArgMatches) -> Result<Config, String> {
    match matches.subcommand() {
        Some(("clock", sub)) => {
            let frames = sub.value_of("frames").map(parse_capacity).transpose()?;
            Ok(Config::Clock(ClockConfig {
                frames,
                trace_file: sub.value_of("trace").map(str::to_string),
                output_file: sub.value_of("output").map(str::to_string),
            }))
        }
        Some(("segment", sub)) => {
            let memory_size = match sub.value_of("memory") {
                Some(text) => text
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| format!("Invalid memory size: {}", text))?,
                None => MEMORY_SIZE,
            };
            Ok(Config::Segment(SegmentConfig {
                memory_size,
                script_file: sub.value_of("script").map(str::to_string),
            }))
        }
        _ => Err("Expected a subcommand; use --help for usage information.".to_string()),
    }
}

fn prompt(text: &str) {
    print!("{}", text);
    let _ = io::stdout().flush();
}

/// Ask for a frame count until a valid one is given; `None` on end of input
fn prompt_capacity() -> Result<Option<usize>, String> {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        prompt("Enter the number of memory frames: ");
        line.clear();
        let read = stdin.lock().read_line(&mut line).map_err(|e| e.to_string())?;
        if read == 0 {
            return Ok(None);
        }
        match parse_capacity(&line) {
            Ok(n) => return Ok(Some(n)),
            Err(msg) => println!("{}", msg),
        }
    }
}

fn print_clock(clock: &ClockReplacer) {
    print!("{}", render_frames(clock));
    println!("{}", render_stats(clock));
}

fn run_clock(config: &ClockConfig) -> Result<(), String> {
    let capacity = match config.frames {
        Some(n) => n,
        None => match prompt_capacity()? {
            Some(n) => n,
            None => {
                println!("Setup cancelled by user.");
                return Ok(());
            }
        },
    };

    let mut clock = ClockReplacer::new(capacity).map_err(|e| e.to_string())?;
    log::info!("clock simulator started with {} frames", capacity);

    if let Some(trace) = &config.trace_file {
        let pages = read_page_references(trace)?;
        log::info!("replaying {} page references from {}", pages.len(), trace);

        let outcomes = clock.request_all(&pages);
        for outcome in &outcomes {
            println!("{}", outcome);
        }
        println!();
        print_clock(&clock);

        if let Some(output) = &config.output_file {
            write_outcomes(output, &outcomes)?;
            log::info!("outcomes written to {}", output);
        }
        return Ok(());
    }

    print_clock(&clock);
    let stdin = io::stdin();
    prompt("page> ");
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| e.to_string())?;
        if QUIT_COMMANDS.contains(&line.trim()) {
            break;
        }
        println!("{}", handle_page_request(&mut clock, &line));
        print_clock(&clock);
        prompt("page> ");
    }
    Ok(())
}

fn run_command(alloc: &mut SegmentAllocator, command: &Command) {
    let message = execute(alloc, command);
    print!("{}", message);
    if !message.ends_with('\n') {
        println!();
    }
    if command.is_mutating() {
        print!("{}", render_memory(alloc));
    }
}

fn run_segment(config: &SegmentConfig) -> Result<(), String> {
    let mut alloc = SegmentAllocator::with_memory_size(config.memory_size).map_err(|e| e.to_string())?;
    log::info!("segmentation simulator started with {} bytes", config.memory_size);

    if let Some(script) = &config.script_file {
        let commands = read_script(script)?;
        log::info!("running {} commands from {}", commands.len(), script);

        for command in commands.iter().take_while(|c| **c != Command::Quit) {
            println!("> {}", command);
            run_command(&mut alloc, command);
        }
        return Ok(());
    }

    print!("{}", render_memory(&alloc));
    let stdin = io::stdin();
    prompt("segment> ");
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| e.to_string())?;
        match parse_command(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => run_command(&mut alloc, &command),
            Ok(None) => {}
            Err(msg) => println!("{}", msg),
        }
        prompt("segment> ");
    }
    Ok(())
}
