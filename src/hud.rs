//! Optional on-screen elements: menu, result overlay, countdown and score.
//!
//! The game only talks to [`HudElement`]; every front end decides what an
//! element is (a DOM node, a window title fragment, a captured string).

/// A single optional UI element.
pub trait HudElement {
    /// Absent elements are skipped by every update.
    fn is_present(&self) -> bool;
    fn set_hidden(&mut self, hidden: bool);
    fn set_text(&mut self, text: &str);
}

/// The set of elements the game updates.
#[derive(Debug, Clone, Default)]
pub struct Hud<E> {
    /// Start menu overlay, clicked to begin the first round.
    pub menu: E,
    /// End-of-round overlay, clicked to play again.
    pub result: E,
    /// Final score inside the result overlay.
    pub final_score: E,
    /// Remaining time.
    pub countdown: E,
    /// Running score during a round.
    pub score: E,
}

impl<E: HudElement> Hud<E> {
    pub fn show_round_started(&mut self, time_budget: Option<f64>) {
        hide(&mut self.menu, true);
        hide(&mut self.result, true);
        self.show_score(0);
        if let Some(budget) = time_budget {
            self.show_countdown(budget);
        }
    }

    pub fn show_score(&mut self, score: u32) {
        write(&mut self.score, &score.to_string());
    }

    pub fn show_countdown(&mut self, remaining: f64) {
        write(&mut self.countdown, &format_countdown(remaining));
    }

    pub fn show_result(&mut self, final_score: u32) {
        hide(&mut self.result, false);
        write(&mut self.final_score, &final_score.to_string());
    }
}

pub fn format_countdown(remaining: f64) -> String {
    format!("Time: {remaining:.2}")
}

fn hide<E: HudElement>(element: &mut E, hidden: bool) {
    if element.is_present() {
        element.set_hidden(hidden);
    }
}

fn write<E: HudElement>(element: &mut E, text: &str) {
    if element.is_present() {
        element.set_text(text);
    }
}

/// In-memory element used by the native and headless front ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSlot {
    present: bool,
    hidden: bool,
    text: String,
}

impl TextSlot {
    pub fn visible() -> Self {
        Self {
            present: true,
            ..Self::default()
        }
    }

    pub fn hidden() -> Self {
        Self {
            present: true,
            hidden: true,
            text: String::new(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl HudElement for TextSlot {
    fn is_present(&self) -> bool {
        self.present
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }
}

impl Hud<TextSlot> {
    /// Menu showing, result overlay hidden, every element present.
    pub fn in_memory() -> Self {
        Self {
            menu: TextSlot::visible(),
            result: TextSlot::hidden(),
            final_score: TextSlot::visible(),
            countdown: TextSlot::visible(),
            score: TextSlot::visible(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl TextSlot {
        fn missing() -> Self {
            Self::default()
        }
    }

    #[test]
    fn round_start_hides_overlays_and_zeroes_score() {
        let mut hud = Hud::in_memory();
        hud.show_score(7);
        hud.show_round_started(Some(100.0));
        assert!(hud.menu.is_hidden());
        assert!(hud.result.is_hidden());
        assert_eq!(hud.score.text(), "0");
        assert_eq!(hud.countdown.text(), "Time: 100.00");
    }

    #[test]
    fn result_overlay_shows_final_score() {
        let mut hud = Hud::in_memory();
        hud.show_result(4);
        assert!(!hud.result.is_hidden());
        assert_eq!(hud.final_score.text(), "4");
    }

    #[test]
    fn missing_elements_are_left_alone() {
        let mut hud = Hud {
            menu: TextSlot::missing(),
            result: TextSlot::missing(),
            final_score: TextSlot::missing(),
            countdown: TextSlot::missing(),
            score: TextSlot::missing(),
        };
        hud.show_round_started(Some(5.0));
        hud.show_result(3);
        assert_eq!(hud.score, TextSlot::missing());
        assert_eq!(hud.result, TextSlot::missing());
    }

    #[test]
    fn countdown_uses_two_decimals() {
        assert_eq!(format_countdown(3.14159), "Time: 3.14");
    }
}
