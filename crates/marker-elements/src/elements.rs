//! Element mapping for marker ids and the rules for combining elements.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a recognized marker stands for.
///
/// The four base elements come from markers 1 to 4; the rest only arise
/// from combinations. Any other marker id maps to [`Element::Unknown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Unknown,
    Fire,
    Water,
    Wind,
    Earth,
    Steam,
    Mist,
    Mud,
    Dust,
    Lava,
}

const MARKER_ELEMENTS: [(u32, Element); 4] = [
    (1, Element::Fire),
    (2, Element::Water),
    (3, Element::Wind),
    (4, Element::Earth),
];

impl Element {
    pub const ALL: [Element; 10] = [
        Element::Unknown,
        Element::Fire,
        Element::Water,
        Element::Wind,
        Element::Earth,
        Element::Steam,
        Element::Mist,
        Element::Mud,
        Element::Dust,
        Element::Lava,
    ];

    pub fn from_marker_id(id: u32) -> Self {
        MARKER_ELEMENTS
            .iter()
            .find(|(marker, _)| *marker == id)
            .map_or(Element::Unknown, |&(_, e)| e)
    }

    /// Marker id carrying this element, for base elements only.
    pub fn marker_id(self) -> Option<u32> {
        MARKER_ELEMENTS
            .iter()
            .find(|(_, e)| *e == self)
            .map(|&(id, _)| id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::Unknown => "unknown",
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Wind => "wind",
            Element::Earth => "earth",
            Element::Steam => "steam",
            Element::Mist => "mist",
            Element::Mud => "mud",
            Element::Dust => "dust",
            Element::Lava => "lava",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RecipeError {
    #[error("recipe {0} + {1} is registered twice")]
    Duplicate(Element, Element),
    #[error("unknown elements cannot be combined")]
    UnknownIngredient,
}

/// Two elements that combine into a third. Order of `inputs` is irrelevant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub inputs: [Element; 2],
    pub result: Element,
}

impl Recipe {
    fn accepts(&self, a: Element, b: Element) -> bool {
        let [x, y] = self.inputs;
        (x == a && y == b) || (x == b && y == a)
    }
}

const STANDARD_RECIPES: [(Element, Element, Element); 5] = [
    (Element::Fire, Element::Water, Element::Steam),
    (Element::Fire, Element::Wind, Element::Mist),
    (Element::Earth, Element::Water, Element::Mud),
    (Element::Wind, Element::Earth, Element::Dust),
    (Element::Fire, Element::Earth, Element::Lava),
];

/// Symmetric combination table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    /// Build from `(a, b, result)` triples, in order.
    ///
    /// Fails when an unordered pair appears twice or an input is
    /// [`Element::Unknown`].
    pub fn new<I>(recipes: I) -> Result<Self, RecipeError>
    where
        I: IntoIterator<Item = (Element, Element, Element)>,
    {
        let mut book = Self {
            recipes: Vec::new(),
        };
        for (a, b, result) in recipes {
            if a == Element::Unknown || b == Element::Unknown {
                return Err(RecipeError::UnknownIngredient);
            }
            if book.combine(a, b).is_some() {
                return Err(RecipeError::Duplicate(a, b));
            }
            book.recipes.push(Recipe {
                inputs: [a, b],
                result,
            });
        }
        Ok(book)
    }

    /// Fire+Water→Steam, Fire+Wind→Mist, Earth+Water→Mud, Wind+Earth→Dust,
    /// Fire+Earth→Lava.
    pub fn standard() -> Self {
        Self {
            recipes: STANDARD_RECIPES
                .iter()
                .map(|&(a, b, result)| Recipe {
                    inputs: [a, b],
                    result,
                })
                .collect(),
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn combine(&self, a: Element, b: Element) -> Option<Element> {
        self.recipes
            .iter()
            .find(|r| r.accepts(a, b))
            .map(|r| r.result)
    }

    /// `(partner, result)` for every recipe using `element`, in
    /// registration order.
    pub fn combinations_with(&self, element: Element) -> Vec<(Element, Element)> {
        self.recipes
            .iter()
            .filter_map(|r| match r.inputs {
                [x, y] if x == element => Some((y, r.result)),
                [x, y] if y == element => Some((x, r.result)),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::standard()
    }
}
