//! In-memory chart lines

use rust_decimal::Decimal;

use super::PriceLevelSource;

/// Horizontal lines in drawing order
#[derive(Debug, Clone, Default)]
pub struct ChartLines {
    lines: Vec<(String, Decimal)>,
}

impl ChartLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a labelled horizontal line
    pub fn draw(&mut self, label: impl Into<String>, price: Decimal) {
        self.lines.push((label.into(), price));
    }

    /// Remove every line carrying `label`, returning how many were removed
    pub fn erase(&mut self, label: &str) -> usize {
        let before = self.lines.len();
        self.lines.retain(|(l, _)| l != label);
        before - self.lines.len()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.lines.iter().map(|(l, p)| (l.as_str(), *p))
    }
}

impl PriceLevelSource for ChartLines {
    fn find_line(&self, label: &str) -> Option<Decimal> {
        self.lines
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, price)| *price)
    }
}
