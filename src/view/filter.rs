use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::course::{Category, CourseId};

/// Active categories. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct CategorySet(BTreeSet<Category>);

impl CategorySet {
    pub fn all() -> Self {
        Self(Category::ALL.into_iter().collect())
    }

    pub fn only(category: Category) -> Self {
        Self(BTreeSet::from([category]))
    }

    /// `None` when `categories` is empty.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Option<Self> {
        let set: BTreeSet<Category> = categories.into_iter().collect();
        if set.is_empty() {
            None
        } else {
            Some(Self(set))
        }
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    /// Whether courses of `category` pass the filter. Categories without a
    /// toggle always pass.
    pub fn admits(&self, category: Category) -> bool {
        category == Category::Unknown || self.contains(category)
    }

    /// Flips `category`. Removing the last active category is refused and
    /// returns `false`.
    pub fn toggle(&mut self, category: Category) -> bool {
        if self.0.contains(&category) {
            if self.0.len() == 1 {
                return false;
            }
            self.0.remove(&category);
        } else {
            self.0.insert(category);
        }
        true
    }

}

impl Default for CategorySet {
    fn default() -> Self {
        Self::all()
    }
}

impl TryFrom<Vec<Category>> for CategorySet {
    type Error = String;

    fn try_from(value: Vec<Category>) -> Result<Self, Self::Error> {
        Self::from_categories(value).ok_or_else(|| "category set cannot be empty".to_string())
    }
}

impl From<CategorySet> for Vec<Category> {
    fn from(value: CategorySet) -> Self {
        value.0.into_iter().collect()
    }
}

/// UI-owned inputs of the derived view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub selected: Option<CourseId>,
    pub categories: CategorySet,
    pub available_only: bool,
}

impl FilterState {
    pub fn select(&mut self, id: CourseId) {
        self.selected = Some(id);
    }

    /// Selecting the already selected course clears the selection.
    pub fn toggle_select(&mut self, id: CourseId) {
        if self.selected.as_ref() == Some(&id) {
            self.selected = None;
        } else {
            self.selected = Some(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn toggle_category(&mut self, category: Category) -> bool {
        self.categories.toggle(category)
    }

    pub fn set_available_only(&mut self, enabled: bool) {
        self.available_only = enabled;
    }
}
