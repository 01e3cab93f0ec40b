//! Tray glyph composition.
//!
//! The icon is an owned RGBA8 canvas. Two overlays are drawn on a copy of the base image:
//! a circle coloured by the system proxy mode and a white play/stop mark for the aggregate
//! running state. Every coordinate is a fraction of the icon width so any square size works.

pub type Rgba = [u8; 4];

const FOREST_GREEN: Rgba = [34, 139, 34, 255];
const RED: Rgba = [255, 0, 0, 255];
const DEEP_PINK: Rgba = [255, 20, 147, 255];
const WHITE: Rgba = [255, 255, 255, 255];

const MODE_CIRCLE_CENTER: f64 = 0.7;
const MODE_CIRCLE_DIAMETER: f64 = 0.6;
const MARK_CENTER: f64 = 0.72;
const PLAY_RADIUS: f64 = 0.22;
const STOP_WIDTH: f64 = 0.44;
const STOP_HEIGHT: f64 = 0.14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProxyMode {
    #[default]
    Direct,
    Proxy,
    Pac,
}

impl ProxyMode {
    pub fn color(self) -> Rgba {
        match self {
            ProxyMode::Direct => FOREST_GREEN,
            ProxyMode::Proxy => RED,
            ProxyMode::Pac => DEEP_PINK,
        }
    }
}

/// The two facts the tray glyph renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IconState {
    pub mode: ProxyMode,
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl IconImage {
    /// Fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Square image filled with a single colour.
    pub fn filled(size: u32, color: Rgba) -> Self {
        let mut image = Self::new(size, size);
        for px in image.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
        image
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw row-major RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(px)
    }

    fn set_pixel(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }

    /// Visits every pixel whose centre lies in the given bounding box.
    fn fill_where(
        &mut self,
        (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
        color: Rgba,
        inside: impl Fn(f64, f64) -> bool,
    ) {
        for y in (min_y.floor() as i64)..=(max_y.ceil() as i64) {
            for x in (min_x.floor() as i64)..=(max_x.ceil() as i64) {
                if inside(x as f64 + 0.5, y as f64 + 0.5) {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) {
        let radius_sq = radius * radius;
        self.fill_where(
            (cx - radius, cy - radius, cx + radius, cy + radius),
            color,
            |x, y| {
                let (dx, dy) = (x - cx, y - cy);
                dx * dx + dy * dy <= radius_sq
            },
        );
    }

    fn fill_rect(&mut self, left: f64, top: f64, width: f64, height: f64, color: Rgba) {
        let (right, bottom) = (left + width, top + height);
        self.fill_where((left, top, right, bottom), color, |x, y| {
            x >= left && x <= right && y >= top && y <= bottom
        });
    }

    fn fill_triangle(&mut self, corners: [(f64, f64); 3], color: Rgba) {
        let xs = corners.map(|(x, _)| x);
        let ys = corners.map(|(_, y)| y);
        let bounds = (
            xs.iter().copied().fold(f64::INFINITY, f64::min),
            ys.iter().copied().fold(f64::INFINITY, f64::min),
            xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        );
        let [a, b, c] = corners;
        self.fill_where(bounds, color, |x, y| {
            let d1 = edge(a, b, (x, y));
            let d2 = edge(b, c, (x, y));
            let d3 = edge(c, a, (x, y));
            let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
            let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
            !(has_neg && has_pos)
        });
    }
}

fn edge(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> f64 {
    (p.0 - b.0) * (a.1 - b.1) - (a.0 - b.0) * (p.1 - b.1)
}

/// Draws the mode circle and the running mark onto a copy of `base`.
pub fn compose_icon(base: &IconImage, state: IconState) -> IconImage {
    let mut icon = base.clone();
    let w = f64::from(base.width());

    let circle_center = w * MODE_CIRCLE_CENTER;
    icon.fill_circle(
        circle_center,
        circle_center,
        w * MODE_CIRCLE_DIAMETER / 2.0,
        state.mode.color(),
    );

    let c = w * MARK_CENTER;
    if state.running {
        let r = w * PLAY_RADIUS;
        let dh = 3f64.sqrt() * r / 2.0;
        icon.fill_triangle([(c - r / 2.0, c - dh), (c + r, c), (c - r / 2.0, c + dh)], WHITE);
    } else {
        let (rw, rh) = (w * STOP_WIDTH, w * STOP_HEIGHT);
        icon.fill_rect(c - rw / 2.0, c - rh / 2.0, rw, rh, WHITE);
    }

    icon
}
