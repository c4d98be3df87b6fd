//! Custom widgets for the mainframe UI

use crate::data::{firewall_label, SlotState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// A labelled progress bar for boot, scan and brute-force
pub struct ProgressBar {
    value: u8,
    label: String,
    color: Color,
    track: Color,
}

impl ProgressBar {
    pub fn new(label: &str, value: u8) -> Self {
        Self {
            value: value.min(100),
            label: label.to_string(),
            color: Color::Green,
            track: Color::DarkGray,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn track(mut self, color: Color) -> Self {
        self.track = color;
        self
    }
}

impl Widget for ProgressBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        // Calculate filled portion
        let inner = area.width - 2;
        let filled = (self.value as u16 * inner) / 100;

        let label = format!("{}: {}%", self.label, self.value);
        buf.set_stringn(area.x, area.y, &label, area.width as usize, Style::default().fg(self.color));

        // Render bar if there's room
        if area.height > 1 {
            let bar_y = area.y + 1;
            buf.set_string(area.x, bar_y, "[", Style::default().fg(self.color));
            buf.set_string(area.x + area.width - 1, bar_y, "]", Style::default().fg(self.color));

            for x in 0..filled {
                buf.set_string(area.x + 1 + x, bar_y, "█", Style::default().fg(self.color));
            }
            for x in filled..inner {
                buf.set_string(area.x + 1 + x, bar_y, "░", Style::default().fg(self.track));
            }
        }
    }
}

/// One firewall slot, e.g. `◆ FW_01 [BREACHED]`
pub struct FirewallNode {
    slot: usize,
    state: SlotState,
    color: Color,
}

impl FirewallNode {
    pub fn new(slot: usize, state: SlotState) -> Self {
        Self {
            slot,
            state,
            color: Color::Green,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Widget for FirewallNode {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut style = Style::default().fg(self.color);
        if self.state == SlotState::Active {
            style = style.add_modifier(Modifier::BOLD);
        }
        let text = format!("{} {}", self.state.symbol(), firewall_label(self.slot, self.state));
        buf.set_stringn(area.x, area.y, &text, area.width as usize, style);
    }
}

/// Double-bordered box for dramatic moments
pub struct DramaticBox {
    title: String,
    content: Vec<String>,
    border_color: Color,
    text_color: Color,
}

impl DramaticBox {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: Vec::new(),
            border_color: Color::Red,
            text_color: Color::White,
        }
    }

    pub fn content(mut self, lines: Vec<String>) -> Self {
        self.content = lines;
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    pub fn text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }
}

impl Widget for DramaticBox {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 2 {
            return;
        }
        let style = Style::default().fg(self.border_color);
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;

        buf.set_string(area.x, area.y, "╔", style);
        buf.set_string(right, area.y, "╗", style);
        buf.set_string(area.x, bottom, "╚", style);
        buf.set_string(right, bottom, "╝", style);
        for x in area.x + 1..right {
            buf.set_string(x, area.y, "═", style);
            buf.set_string(x, bottom, "═", style);
        }
        for y in area.y + 1..bottom {
            buf.set_string(area.x, y, "║", style);
            buf.set_string(right, y, "║", style);
        }

        // Title, centered on the top border
        let title = format!(" {} ", self.title);
        let title_width = title.chars().count() as u16;
        if title_width < area.width {
            let title_x = area.x + (area.width - title_width) / 2;
            buf.set_string(title_x, area.y, &title, style.add_modifier(Modifier::BOLD));
        }

        // Content, centered
        let inner_width = area.width - 4;
        for (i, line) in self.content.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= bottom {
                break;
            }
            let width = (line.chars().count() as u16).min(inner_width);
            let x = area.x + 2 + (inner_width - width) / 2;
            buf.set_stringn(x, y, line, inner_width as usize, Style::default().fg(self.text_color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        let area = Rect::new(0, 0, 12, 2);
        let mut buf = Buffer::empty(area);
        ProgressBar::new("BOOT", 50).render(area, &mut buf);
        assert!(row(&buf, 0).starts_with("BOOT: 50%"));
        assert_eq!(row(&buf, 1), "[█████░░░░░]");
    }

    #[test]
    fn firewall_node_shows_label() {
        let area = Rect::new(0, 0, 24, 1);
        let mut buf = Buffer::empty(area);
        FirewallNode::new(1, SlotState::Locked).render(area, &mut buf);
        assert!(row(&buf, 0).starts_with("■ FW_02 [LOCKED]"));
    }

    #[test]
    fn dramatic_box_tolerates_tiny_areas() {
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        DramaticBox::new("ACCESS_DENIED").render(area, &mut buf);
    }
}
