use serde::{Deserialize, Serialize};
use std::fmt;

/// Pet category. The declaration order is the display order of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Dogs,
    Cats,
    Birds,
    Rabbits,
    Reptiles,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Dogs,
        Category::Cats,
        Category::Birds,
        Category::Rabbits,
        Category::Reptiles,
    ];

    /// Title shown on the category header row.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Dogs => "Dogs",
            Self::Cats => "Cats",
            Self::Birds => "Birds",
            Self::Rabbits => "Rabbits",
            Self::Reptiles => "Reptiles",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An adoptable pet. Two pets are the same pet when all fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pet {
    pub name: String,
    pub age: u32,
    /// Image asset name; the terminal front end only shows it as text.
    #[serde(default)]
    pub image: String,
    pub category: Category,
}

impl Pet {
    pub fn new(name: impl Into<String>, age: u32, image: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            age,
            image: image.into(),
            category,
        }
    }

    /// "1 year old" / "3 years old".
    pub fn age_label(&self) -> String {
        if self.age == 1 {
            "1 year old".to_string()
        } else {
            format!("{} years old", self.age)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn category_order_is_declaration_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
        assert_eq!(Category::ALL[0].to_string(), "Dogs");
    }

    #[test]
    fn pets_compare_by_value() {
        let a = Pet::new("Rex", 3, "rex", Category::Dogs);
        let b = Pet::new("Rex", 3, "rex", Category::Dogs);
        let c = Pet::new("Rex", 4, "rex", Category::Dogs);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Pet> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn age_label_handles_singular() {
        assert_eq!(Pet::new("Kiwi", 1, "", Category::Birds).age_label(), "1 year old");
        assert_eq!(Pet::new("Milo", 5, "", Category::Cats).age_label(), "5 years old");
    }
}
