use jarvis_core::config::WorkbenchConfig;
use serde::{Deserialize, Serialize};

/// Centimeters per pixel at 96 DPI.
pub const DEFAULT_PIXELS_TO_CM: f64 = 0.0264583333;

/// A pointer position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// State of one measuring session. Dropped when the overlay closes.
#[derive(Debug, Clone)]
pub struct MeasuringWorkbench {
    pixels_to_cm: f64,
    start: Option<Point>,
    current: Option<Point>,
    drawing: bool,
}

impl Default for MeasuringWorkbench {
    fn default() -> Self {
        Self::new(DEFAULT_PIXELS_TO_CM)
    }
}

impl MeasuringWorkbench {
    pub fn new(pixels_to_cm: f64) -> Self {
        Self {
            pixels_to_cm,
            start: None,
            current: None,
            drawing: false,
        }
    }

    pub fn from_config(config: &WorkbenchConfig) -> Self {
        Self::new(config.pixels_to_cm)
    }

    /// Pointer or touch down: anchor a new measurement.
    pub fn press(&mut self, at: Point) {
        self.start = Some(at);
        self.current = Some(at);
        self.drawing = true;
    }

    /// Pointer moved. Ignored unless the pointer is held down.
    pub fn move_to(&mut self, at: Point) {
        if self.drawing {
            self.current = Some(at);
        }
    }

    /// Pointer or touch up. The last reading stays visible.
    pub fn release(&mut self) {
        self.drawing = false;
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn current(&self) -> Option<Point> {
        self.current
    }

    /// Euclidean distance in pixels, zero before the first press.
    pub fn distance_px(&self) -> f64 {
        match (self.start, self.current) {
            (Some(start), Some(current)) => start.distance_to(&current),
            _ => 0.0,
        }
    }

    pub fn distance_cm(&self) -> f64 {
        self.distance_px() * self.pixels_to_cm
    }

    /// Display reading, e.g. `2.65 CM`.
    pub fn reading(&self) -> String {
        format!("{:.2} CM", self.distance_cm())
    }

    /// Run one press-drag-release gesture and return the reading in centimeters.
    pub fn measure(&mut self, from: Point, to: Point) -> f64 {
        self.press(from);
        self.move_to(to);
        self.release();
        let cm = self.distance_cm();
        tracing::debug!(px = self.distance_px(), cm, "Workbench measurement");
        cm
    }
}
