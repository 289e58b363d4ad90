// Runs repair sessions in a loop for profiling.
//
//   hot_repair [--file x.go] [--seconds 3] [--repeat 32] [--purge]
use go125_repair::{repair, PositionSpace, RepairOptions};
use std::hint::black_box as bb;
use std::time::{Duration, Instant};

const EDITING: &str = r#"
package main

import "fmt"

type Point struct{ X, Y float64 }

func (p *Point) Scale(f float64) {
    if f == 0
    p.X = p.X * f
    defer fmt.
    xs := []Point
    switch {
    cas
    }
}

func main() {
    p := &Point{1, 2}
    p.Scale(2)
    fmt.Println(p.)
}
"#;

fn flag<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    let at = args.iter().position(|a| a == key)?;
    args.get(at + 1).map(String::as_str)
}

fn flag_or<T: std::str::FromStr>(args: &[String], key: &str, default: T) -> T {
    flag(args, key).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let seconds: f64 = flag_or(&args, "--seconds", 3.0);
    let repeat: usize = flag_or(&args, "--repeat", 32);

    let base = match flag(&args, "--file") {
        Some(path) => std::fs::read_to_string(path)?,
        None => EDITING.to_string(),
    };
    let mut options = RepairOptions::default();
    if args.iter().any(|a| a == "--purge") {
        options = options.purging_func_bodies();
    }

    let input = base.repeat(repeat.max(1));
    let space = PositionSpace::shared();
    let dur = Duration::from_secs_f64(seconds);
    let start = Instant::now();

    let mut sessions: u64 = 0;
    let mut fixes: u64 = 0;
    while start.elapsed() < dur {
        let res = repair(&space, "hot.go", bb(input.as_bytes()), &options);
        fixes += res.fixes.len() as u64;
        sessions += 1;
        bb(res);
    }

    eprintln!(
        "hot_repair done: sessions={sessions}, fixes={fixes}, bytes={}, elapsed={:?}",
        input.len(),
        start.elapsed()
    );
    Ok(())
}
