/// Сортировка табличных данных
use std::cmp::Ordering;

/// Trait для типов данных, поддерживающих сортировку
pub trait Sortable {
    /// Сравнивает два объекта по указанному полю
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Stable sort by one column
pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending { cmp } else { cmp.reverse() }
    });
}

/// Active column and direction of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub ascending: bool,
}

impl SortState {
    pub fn new(field: &str, ascending: bool) -> Self {
        Self {
            field: field.to_string(),
            ascending,
        }
    }

    /// Header click: same column flips direction, another column starts ascending
    pub fn toggle(&mut self, field: &str) {
        if self.field == field {
            self.ascending = !self.ascending;
        } else {
            self.field = field.to_string();
            self.ascending = true;
        }
    }

    pub fn indicator(&self, field: &str) -> &'static str {
        get_sort_indicator(&self.field, field, self.ascending)
    }
}

/// Получить индикатор сортировки для заголовка
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending { " ▲" } else { " ▼" }
    } else {
        " ⇅"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_state_toggle() {
        let mut state = SortState::new("start", false);
        state.toggle("start");
        assert!(state.ascending);
        state.toggle("code");
        assert_eq!(state, SortState::new("code", true));
        assert_eq!(state.indicator("code"), " ▲");
        assert_eq!(state.indicator("start"), " ⇅");
    }
}
