//! Thin demo CLI for `ubidi`.
//!
//! Not part of the core (spec §1, §6: "no CLI is part of the core"). Reads
//! one line of text from an argument or stdin, runs it through
//! `log_to_visual`, and prints the resolved levels and visual order.

use std::env;
use std::io::{self, Read};

use ubidi::{log_to_visual, Direction};

fn parse_direction(arg: &str) -> Option<Direction> {
    match arg {
        "--ltr" => Some(Direction::Ltr),
        "--rtl" => Some(Direction::Rtl),
        "--auto" => Some(Direction::Auto),
        _ => None,
    }
}

fn main() {
    let mut base_dir = Direction::Auto;
    let mut text_arg: Option<String> = None;

    for arg in env::args().skip(1) {
        if let Some(dir) = parse_direction(&arg) {
            base_dir = dir;
        } else {
            text_arg = Some(arg);
        }
    }

    let line = match text_arg {
        Some(s) => s,
        None => {
            let mut buf = String::new();
            if io::stdin().read_to_string(&mut buf).is_err() {
                eprintln!("ubidi: failed to read stdin");
                std::process::exit(1);
            }
            buf.trim_end_matches('\n').to_string()
        }
    };

    let text: Vec<char> = line.chars().collect();
    match log_to_visual(&text, base_dir) {
        Ok(info) => {
            println!("base direction: {:?}", info.base_direction);
            let levels: Vec<String> = info.embedding_levels.iter().map(|l| l.to_string()).collect();
            println!("levels:         {}", levels.join(" "));
            let visual: String = info.visual_str.iter().collect();
            println!("visual:         {}", visual);
        }
        Err(e) => {
            eprintln!("ubidi: {}", e);
            std::process::exit(1);
        }
    }
}
