use std::collections::HashSet;

/// Флаги видимости серий на корневом уровне.
///
/// Only the root chart carries a legend; drill levels render every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegendVisibility {
    labels: Vec<String>,
    hidden: HashSet<String>,
}

impl LegendVisibility {
    pub fn new(labels: impl IntoIterator<Item = String>) -> Self {
        let mut legend = Self::default();
        legend.reset(labels);
        legend
    }

    /// New label set, everything visible
    pub fn reset(&mut self, labels: impl IntoIterator<Item = String>) {
        self.labels.clear();
        for label in labels {
            if !self.labels.contains(&label) {
                self.labels.push(label);
            }
        }
        self.hidden.clear();
    }

    pub fn clear(&mut self) {
        self.labels.clear();
        self.hidden.clear();
    }

    /// Flips one label. Unknown labels are ignored.
    pub fn toggle(&mut self, label: &str) {
        if !self.labels.iter().any(|l| l == label) {
            return;
        }
        if !self.hidden.remove(label) {
            self.hidden.insert(label.to_string());
        }
    }

    /// Majority hidden -> show everything, otherwise hide everything
    pub fn toggle_all(&mut self) {
        if self.hidden.len() * 2 > self.labels.len() {
            self.show_all();
        } else {
            self.hidden = self.labels.iter().cloned().collect();
        }
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    pub fn is_hidden(&self, label: &str) -> bool {
        self.hidden.contains(label)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    pub fn visible_count(&self) -> usize {
        self.labels.len() - self.hidden.len()
    }

    pub fn all_hidden(&self) -> bool {
        !self.labels.is_empty() && self.hidden.len() == self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Caption of the bulk button
    pub fn toggle_all_caption(&self) -> &'static str {
        if self.hidden.len() * 2 > self.labels.len() {
            "Включить все"
        } else {
            "Отключить все"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legend() -> LegendVisibility {
        LegendVisibility::new(
            ["Mechanical", "Electrical", "Hydraulic"]
                .into_iter()
                .map(String::from),
        )
    }

    #[test]
    fn test_toggle() {
        let mut l = legend();
        l.toggle("Electrical");
        assert!(l.is_hidden("Electrical"));
        assert_eq!(l.visible_count(), 2);
        l.toggle("Electrical");
        assert!(!l.is_hidden("Electrical"));

        l.toggle("Pneumatic");
        assert_eq!(l.hidden_count(), 0);
    }

    #[test]
    fn test_toggle_all_follows_majority() {
        let mut l = legend();
        l.toggle("Electrical");
        assert_eq!(l.toggle_all_caption(), "Отключить все");
        l.toggle_all();
        assert!(l.all_hidden());
        assert_eq!(l.toggle_all_caption(), "Включить все");

        l.toggle("Mechanical");
        l.toggle_all();
        assert_eq!(l.hidden_count(), 0);
    }

    #[test]
    fn test_reset_shows_everything() {
        let mut l = legend();
        l.toggle_all();
        l.reset(vec!["A".to_string(), "A".to_string(), "B".to_string()]);
        assert_eq!(l.labels().len(), 2);
        assert_eq!(l.visible_count(), 2);
        l.clear();
        assert!(l.is_empty());
        assert!(!l.all_hidden());
    }
}
