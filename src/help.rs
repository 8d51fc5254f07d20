use crate::colors::{status_to_scheme, StatusColor};
use crate::terminal::Terminal;
use crossterm::style::Color;

pub const HELP: &str = "\
FLOWMAP
─────────────────
←↑↓→/hjkl  Pan
+/-        Zoom in/out
0          Reset view
r          Refresh now
space      Pause
!@#$%&)    Color scheme
?          Toggle help
q/Esc      Quit";

/// Render a centered box with the provided text.
pub fn render_help_overlay(term: &mut Terminal, help_text: &str) {
    let lines: Vec<&str> = help_text.lines().collect();
    if lines.is_empty() {
        return;
    }

    let (width, height) = term.size();
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
    let box_w = inner + 2;
    let box_h = lines.len() + 2;
    let x0 = ((width as usize).saturating_sub(box_w) / 2) as i32;
    let y0 = ((height as usize).saturating_sub(box_h) / 2) as i32;

    let border = Some(Color::White);
    let text = Some(Color::Grey);
    let bar = "─".repeat(inner);

    term.set_str(x0, y0, &format!("┌{}┐", bar), border, false);
    for (i, line) in lines.iter().enumerate() {
        let y = y0 + 1 + i as i32;
        let pad = inner - 1 - line.chars().count();
        term.set(x0, y, '│', border, false);
        term.set_str(x0 + 1, y, &format!(" {}{}", line, " ".repeat(pad)), text, false);
        term.set(x0 + 1 + inner as i32, y, '│', border, false);
    }
    term.set_str(x0, y0 + box_h as i32 - 1, &format!("└{}┘", bar), border, false);
}

/// One-line status in the top-left corner
pub fn render_status(term: &mut Terminal, scheme: u8, text: &str, status: StatusColor) {
    let (width, _) = term.size();
    let max = (width as usize).saturating_sub(2);
    let shown: String = text.chars().take(max).collect();
    term.set_str(1, 0, &shown, Some(status_to_scheme(scheme, status)), status == StatusColor::Critical);
}
