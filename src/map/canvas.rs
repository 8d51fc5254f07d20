use crate::colors::scheme_color;
use crate::terminal::Terminal;
use crossterm::style::Color;

/// Dot layers, later ones win when a cell mixes them
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Ink {
    Empty = 0,
    Grid = 1,
    Land = 2,
    Flow = 3,
    Marker = 4,
}

/// 2x4 dots per terminal cell
pub struct BrailleCanvas {
    width: usize,
    height: usize,
    ink: Vec<Ink>,
    color: Vec<Option<Color>>,
}

impl BrailleCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let width = cols as usize * 2;
        let height = rows as usize * 4;
        Self {
            width,
            height,
            ink: vec![Ink::Empty; width * height],
            color: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.ink.fill(Ink::Empty);
        self.color.fill(None);
    }

    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Ink {
        self.index(x, y).map(|i| self.ink[i]).unwrap_or(Ink::Empty)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    pub fn set(&mut self, x: i32, y: i32, ink: Ink, color: Option<Color>) {
        if let Some(i) = self.index(x, y) {
            if ink >= self.ink[i] {
                self.ink[i] = ink;
                self.color[i] = color;
            }
        }
    }

    /// Bresenham line, widened to `thickness` dots
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), thickness: i32, ink: Ink, color: Option<Color>) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = (thickness.max(1) - 1) / 2;
        let extra = (thickness.max(1) - 1) - half;

        loop {
            for off in -half..=extra {
                if dx >= -dy {
                    self.set(x0, y0 + off, ink, color);
                } else {
                    self.set(x0 + off, y0, ink, color);
                }
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn disc(&mut self, center: (i32, i32), radius: i32, ink: Ink, color: Option<Color>) {
        let r = radius.max(0);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set(center.0 + dx, center.1 + dy, ink, color);
                }
            }
        }
    }

    /// Copy the dots into terminal cells as braille characters
    pub fn blit(&self, term: &mut Terminal, scheme: u8) {
        const DOT_BITS: [(usize, usize, u32); 8] = [
            (0, 0, 0x01), (0, 1, 0x02), (0, 2, 0x04),
            (1, 0, 0x08), (1, 1, 0x10), (1, 2, 0x20),
            (0, 3, 0x40), (1, 3, 0x80),
        ];

        for cy in 0..self.height / 4 {
            for cx in 0..self.width / 2 {
                let mut dots: u32 = 0;
                let mut top = Ink::Empty;
                let mut top_color = None;

                for &(ox, oy, bit) in &DOT_BITS {
                    let i = (cy * 4 + oy) * self.width + cx * 2 + ox;
                    let ink = self.ink[i];
                    if ink != Ink::Empty {
                        dots |= bit;
                        if ink >= top {
                            top = ink;
                            top_color = self.color[i].or(top_color);
                        }
                    }
                }

                if dots == 0 {
                    continue;
                }

                let ch = char::from_u32(0x2800 + dots).unwrap_or(' ');
                let (color, bold) = match top_color {
                    Some(c) => (c, top >= Ink::Flow),
                    None => {
                        let intensity = match top {
                            Ink::Grid => 0,
                            Ink::Land => 1,
                            Ink::Flow => 2,
                            _ => 3,
                        };
                        scheme_color(scheme, intensity, top >= Ink::Flow)
                    }
                };
                term.set(cx as i32, cy as i32, ch, Some(color), bold);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_ink_wins() {
        let mut c = BrailleCanvas::new(4, 4);
        c.set(1, 1, Ink::Flow, None);
        c.set(1, 1, Ink::Land, None);
        assert_eq!(c.get(1, 1), Ink::Flow);
        c.set(1, 1, Ink::Marker, Some(Color::Red));
        assert_eq!(c.get(1, 1), Ink::Marker);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut c = BrailleCanvas::new(2, 2);
        c.set(-1, 0, Ink::Land, None);
        c.set(100, 100, Ink::Land, None);
        assert_eq!(c.get(-1, 0), Ink::Empty);
    }

    #[test]
    fn line_covers_both_ends() {
        let mut c = BrailleCanvas::new(10, 5);
        c.line((0, 0), (9, 6), 1, Ink::Flow, None);
        assert_eq!(c.get(0, 0), Ink::Flow);
        assert_eq!(c.get(9, 6), Ink::Flow);
    }

    #[test]
    fn thick_line_is_wider() {
        let mut c = BrailleCanvas::new(10, 5);
        c.line((0, 8), (19, 8), 3, Ink::Flow, None);
        assert_eq!(c.get(5, 7), Ink::Flow);
        assert_eq!(c.get(5, 9), Ink::Flow);
        assert_eq!(c.get(5, 10), Ink::Empty);
    }

    #[test]
    fn disc_radius() {
        let mut c = BrailleCanvas::new(10, 5);
        c.disc((10, 10), 2, Ink::Marker, None);
        assert_eq!(c.get(12, 10), Ink::Marker);
        assert_eq!(c.get(12, 12), Ink::Empty);
    }

    #[test]
    fn clear_resets() {
        let mut c = BrailleCanvas::new(3, 3);
        c.disc((2, 2), 1, Ink::Land, None);
        c.clear();
        assert_eq!(c.get(2, 2), Ink::Empty);
    }
}
