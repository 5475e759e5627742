//! The fixed set of shopping categories a customer can favor.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryId {
    A,
    B,
    C,
    D,
}

impl CategoryId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::A => "A",
            CategoryId::B => "B",
            CategoryId::C => "C",
            CategoryId::D => "D",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(CategoryId::A),
            "B" => Some(CategoryId::B),
            "C" => Some(CategoryId::C),
            "D" => Some(CategoryId::D),
            _ => None,
        }
    }

    pub fn all() -> Vec<CategoryId> {
        vec![CategoryId::A, CategoryId::B, CategoryId::C, CategoryId::D]
    }

    /// The static descriptor for this category.
    pub fn descriptor(&self) -> &'static CategoryDescriptor {
        match self {
            CategoryId::A => &CATEGORIES[0],
            CategoryId::B => &CATEGORIES[1],
            CategoryId::C => &CATEGORIES[2],
            CategoryId::D => &CATEGORIES[3],
        }
    }

    pub fn title(&self) -> &'static str {
        self.descriptor().title
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDescriptor {
    pub id: CategoryId,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub static CATEGORIES: [CategoryDescriptor; 4] = [
    CategoryDescriptor {
        id: CategoryId::A,
        title: "Category A - Electronics",
        description: "Latest gadgets and tech accessories for the modern lifestyle.",
        icon: "🛍",
    },
    CategoryDescriptor {
        id: CategoryId::B,
        title: "Category B - Fashion",
        description: "Trendy clothing and accessories to elevate your style.",
        icon: "👤",
    },
    CategoryDescriptor {
        id: CategoryId::C,
        title: "Category C - Home & Garden",
        description: "Everything you need to create your perfect living space.",
        icon: "📦",
    },
    CategoryDescriptor {
        id: CategoryId::D,
        title: "Category D - Sports & Outdoors",
        description: "Gear and equipment for your active lifestyle and adventures.",
        icon: "🛍",
    },
];

/// Categories in display order: the favorite first, then the rest in their
/// fixed order. Without a favorite the fixed order is returned unchanged.
pub fn ordered_categories(favorite: Option<CategoryId>) -> Vec<&'static CategoryDescriptor> {
    match favorite {
        None => CATEGORIES.iter().collect(),
        Some(id) => std::iter::once(id.descriptor())
            .chain(CATEGORIES.iter().filter(|c| c.id != id))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_ids_match_table() {
        for id in CategoryId::all() {
            assert_eq!(id.descriptor().id, id);
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(CategoryId::from_str("c"), Some(CategoryId::C));
        assert_eq!(CategoryId::from_str(" D "), Some(CategoryId::D));
        assert_eq!(CategoryId::from_str(""), None);
        assert_eq!(CategoryId::from_str("E"), None);
    }

    #[test]
    fn test_ordered_without_favorite_keeps_fixed_order() {
        let ids: Vec<CategoryId> = ordered_categories(None).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CategoryId::A, CategoryId::B, CategoryId::C, CategoryId::D]);
    }

    #[test]
    fn test_ordered_moves_favorite_first() {
        let ids: Vec<CategoryId> = ordered_categories(Some(CategoryId::C))
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![CategoryId::C, CategoryId::A, CategoryId::B, CategoryId::D]);
    }
}
