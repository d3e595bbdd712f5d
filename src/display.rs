//! Frame formatting and terminal painting for the dashboard

use std::io::{self, IsTerminal, Write};

use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use crate::core::DeviceTelemetry;

/// Layout selected once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Vertical,
    Horizontal,
}

/// Immutable display configuration resolved from the command line
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub layout: Layout,
    /// Width of the name column in vertical layout; 0 hides it
    pub name_width: usize,
    pub force_color: bool,
    pub no_color: bool,
}

impl DisplayOptions {
    pub fn use_color(&self) -> bool {
        if self.no_color {
            false
        } else if self.force_color {
            true
        } else {
            io::stdout().is_terminal()
        }
    }
}

/// Shorten string from the left with an ellipsis, keeping the model suffix
fn shorten_left(text: &str, width: usize, placeholder: &str) -> String {
    if width == 0 {
        return String::new();
    }
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(placeholder.chars().count());
    if keep == 0 {
        return placeholder.chars().take(width).collect();
    }
    let skip = text.chars().count() - keep;
    format!(
        "{}{}",
        placeholder,
        text.chars().skip(skip).collect::<String>()
    )
}

/// One vertical line: index cell, optional left-justified name column,
/// power, memory used, utilization.
///
/// Fields are padded before coloring so ANSI codes never skew the columns.
pub fn format_vertical_line(
    dev: &DeviceTelemetry,
    name_width: usize,
    use_color: bool,
) -> String {
    let mut s = String::new();

    let index_cell = format!("G{}", dev.index);
    if use_color {
        s.push_str(&index_cell.cyan().to_string());
    } else {
        s.push_str(&index_cell);
    }

    if name_width > 0 {
        let name = shorten_left(&dev.name, name_width, "…");
        let padded = format!("{:<width$}", name, width = name_width);
        if use_color {
            s.push_str(&format!(" | {}", padded.blue()));
        } else {
            s.push_str(&format!(" | {}", padded));
        }
    }

    let power = format!("{:>3} W", dev.power_draw);
    let memory = format!("{:>5} MiB", dev.memory_used);
    let util = format!("{:>3}%", dev.utilization);
    if use_color {
        s.push_str(&format!(
            " | {} | {} | {}",
            power.magenta(),
            memory.yellow(),
            util.green()
        ));
    } else {
        s.push_str(&format!(" | {} | {} | {}", power, memory, util));
    }

    s
}

/// All devices concatenated on a single line:
/// `G0, 150 W, 8192 MiB, 87% | G1, 95 W, 2048 MiB, 12%`
pub fn format_horizontal(devices: &[DeviceTelemetry]) -> String {
    devices
        .iter()
        .map(|d| {
            format!(
                "G{}, {} W, {} MiB, {}%",
                d.index, d.power_draw, d.memory_used, d.utilization
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Build the lines of one frame.
pub fn build_frame(
    devices: &[DeviceTelemetry],
    opts: &DisplayOptions,
    use_color: bool,
) -> Vec<String> {
    if devices.is_empty() {
        return vec!["(No GPUs are available)".to_string()];
    }
    match opts.layout {
        Layout::Horizontal => vec![format_horizontal(devices)],
        Layout::Vertical => devices
            .iter()
            .map(|d| format_vertical_line(d, opts.name_width, use_color))
            .collect(),
    }
}

/// Clear the viewport, write the frame at fixed coordinates, then flush.
pub fn paint<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in lines.iter().enumerate() {
        queue!(out, MoveTo(0, row as u16), Print(line))?;
    }
    out.flush()
}
