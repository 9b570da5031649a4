//! Temperature sparkline widget for inline visualization

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different temperatures (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline widget showing today's hourly temperatures
pub struct TemperatureSparkline<'a> {
    /// Temperature for each hour
    temperatures: &'a [f64],
    /// Lowest temperature of the range
    min: f64,
    /// Highest temperature of the range
    max: f64,
    /// Current hour marker (index into temperatures)
    current_position: Option<usize>,
    /// Style for the sparkline
    style: Style,
    /// Style for the current hour marker
    marker_style: Style,
}

impl<'a> TemperatureSparkline<'a> {
    pub fn new(temperatures: &'a [f64]) -> Self {
        let min = temperatures.iter().copied().fold(f64::INFINITY, f64::min);
        let max = temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            temperatures,
            min,
            max,
            current_position: None,
            style: Style::default().fg(Color::Cyan),
            marker_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn current_position(mut self, pos: usize) -> Self {
        self.current_position = Some(pos);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn temperature_to_block(&self, temperature: f64) -> char {
        let range = self.max - self.min;
        if !range.is_finite() || range <= f64::EPSILON {
            return BLOCKS[3];
        }
        let normalized = ((temperature - self.min) / range).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for TemperatureSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;

        for (i, temperature) in self.temperatures.iter().take(width).enumerate() {
            let block = self.temperature_to_block(*temperature);
            let x = area.x + i as u16;
            let y = area.y;

            let style = if self.current_position == Some(i) {
                self.marker_style
            } else {
                self.style
            };

            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(block).set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_for_minimum_and_maximum() {
        let temperatures = [12.0, 20.0, 28.0];
        let sparkline = TemperatureSparkline::new(&temperatures);
        assert_eq!(sparkline.temperature_to_block(12.0), '▁');
        assert_eq!(sparkline.temperature_to_block(28.0), '█');
    }

    #[test]
    fn test_block_for_mid_range() {
        let temperatures = [10.0, 30.0];
        let sparkline = TemperatureSparkline::new(&temperatures);
        let block = sparkline.temperature_to_block(20.0);
        assert!(BLOCKS.contains(&block));
        assert_ne!(block, '▁');
        assert_ne!(block, '█');
    }

    #[test]
    fn test_flat_series_uses_middle_block() {
        let temperatures = [21.0, 21.0, 21.0];
        let sparkline = TemperatureSparkline::new(&temperatures);
        assert_eq!(sparkline.temperature_to_block(21.0), '▄');
    }

    #[test]
    fn test_empty_series_does_not_panic() {
        let sparkline = TemperatureSparkline::new(&[]);
        assert_eq!(sparkline.temperature_to_block(5.0), '▄');
    }

    #[test]
    fn test_render_marks_current_hour() {
        let temperatures = [10.0, 15.0, 20.0];
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);

        TemperatureSparkline::new(&temperatures)
            .current_position(1)
            .render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "▁");
        assert_eq!(buf[(2, 0)].symbol(), "█");
        assert_eq!(buf[(1, 0)].fg, Color::Yellow);
        assert_eq!(buf[(0, 0)].fg, Color::Cyan);
    }
}
