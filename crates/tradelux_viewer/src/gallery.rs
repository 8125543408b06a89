//! Photo categories and the flat, navigable image sequence.
//!
//! Thumbnails are shown grouped by category, while the lightbox walks one flat
//! sequence built from all categories. Everything here is a pure function of
//! the category data; [`Gallery`] only caches the derived sequence so it is
//! rebuilt when the data changes and not on every view pass.

use serde::{Deserialize, Serialize};

/// Derive a stable category id from its label.
///
/// Lowercases the label and replaces every run of whitespace with a single `-`
/// ("Driver Side" -> "driver-side").
pub fn category_id(label: &str) -> String {
    let mut id = String::with_capacity(label.len());
    let mut in_whitespace = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('-');
                in_whitespace = true;
            }
        } else {
            id.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }
    id
}

/// A named group of image URLs ("Front", "Interior", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoCategory {
    label: String,
    id: String,
    images: Vec<String>,
}

impl PhotoCategory {
    /// Create a category; the id is derived from the label.
    pub fn new(label: impl Into<String>, images: Vec<String>) -> Self {
        let label = label.into();
        let id = category_id(&label);
        Self { label, id, images }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// One navigable image in the flat sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatImage {
    pub url: String,
    pub category_label: String,
    pub index_within_category: usize,
}

/// Concatenate all categories into one sequence, category order first.
pub fn build_sequence(categories: &[PhotoCategory]) -> Vec<FlatImage> {
    categories
        .iter()
        .flat_map(|category| {
            category
                .images
                .iter()
                .enumerate()
                .map(|(index, url)| FlatImage {
                    url: url.clone(),
                    category_label: category.label.clone(),
                    index_within_category: index,
                })
        })
        .collect()
}

/// Position of the first image with this URL, if any.
///
/// Thumbnail clicks resolve through the URL rather than the category-local
/// index; `None` means the click is stale and the lightbox must stay closed.
pub fn select_by_url(sequence: &[FlatImage], url: &str) -> Option<usize> {
    sequence.iter().position(|image| image.url == url)
}

/// Move from `current` to `target`, or stay put if `target` is out of range.
///
/// Out-of-range targets (negative, or at/after the end) are a no-op so that
/// "previous" on the first image and "next" on the last are safe.
pub fn navigate(sequence: &[FlatImage], current: usize, target: isize) -> usize {
    match usize::try_from(target) {
        Ok(target) if target < sequence.len() => target,
        _ => current,
    }
}

/// How categories without images are shown in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyCategoryPolicy {
    /// Leave empty categories out entirely
    #[default]
    Hide,
    /// Show one placeholder tile for each empty category
    Placeholder,
}

impl EmptyCategoryPolicy {
    pub fn from_show_empty(show_empty_categories: bool) -> Self {
        if show_empty_categories {
            EmptyCategoryPolicy::Placeholder
        } else {
            EmptyCategoryPolicy::Hide
        }
    }
}

/// What a grid section displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContent {
    /// Thumbnails for each image URL of the category
    Images(Vec<String>),
    /// A single non-navigable placeholder tile
    Placeholder,
}

/// One category as it appears in the photo grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySection {
    pub id: String,
    pub label: String,
    pub content: SectionContent,
}

/// Grid sections for the categories, applying one empty-category policy to all.
pub fn display_sections(
    categories: &[PhotoCategory],
    policy: EmptyCategoryPolicy,
) -> Vec<CategorySection> {
    categories
        .iter()
        .filter_map(|category| {
            let content = if category.is_empty() {
                match policy {
                    EmptyCategoryPolicy::Hide => return None,
                    EmptyCategoryPolicy::Placeholder => SectionContent::Placeholder,
                }
            } else {
                SectionContent::Images(category.images.clone())
            };
            Some(CategorySection {
                id: category.id.clone(),
                label: category.label.clone(),
                content,
            })
        })
        .collect()
}

/// Category data plus its cached flat sequence.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    categories: Vec<PhotoCategory>,
    sequence: Vec<FlatImage>,
    generation: u64,
}

impl Gallery {
    pub fn new(categories: Vec<PhotoCategory>) -> Self {
        let sequence = build_sequence(&categories);
        Self {
            categories,
            sequence,
            generation: 0,
        }
    }

    /// Replace the category data.
    ///
    /// The sequence is rebuilt only if the data differs from what is held.
    /// Returns true if a rebuild happened.
    pub fn set_categories(&mut self, categories: Vec<PhotoCategory>) -> bool {
        if categories == self.categories {
            return false;
        }
        self.sequence = build_sequence(&categories);
        self.categories = categories;
        self.generation += 1;
        log::debug!(
            "Gallery rebuilt (generation {}): {} categories, {} images",
            self.generation,
            self.categories.len(),
            self.sequence.len()
        );
        true
    }

    pub fn categories(&self) -> &[PhotoCategory] {
        &self.categories
    }

    pub fn sequence(&self) -> &[FlatImage] {
        &self.sequence
    }

    /// Number of rebuilds so far; changes exactly when the sequence does.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FlatImage> {
        self.sequence.get(index)
    }

    pub fn sections(&self, policy: EmptyCategoryPolicy) -> Vec<CategorySection> {
        display_sections(&self.categories, policy)
    }

    /// Category owning a URL, for per-image fallbacks.
    pub fn category_of(&self, url: &str) -> Option<&PhotoCategory> {
        self.categories
            .iter()
            .find(|category| category.images.iter().any(|image| image == url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn sample_categories() -> Vec<PhotoCategory> {
        vec![
            PhotoCategory::new("Front", urls(&["front-1.jpg", "front-2.jpg"])),
            PhotoCategory::new("Rear", Vec::new()),
            PhotoCategory::new("Driver Side", urls(&["driver.jpg"])),
            PhotoCategory::new("Interior", urls(&["int-1.jpg", "int-2.jpg"])),
        ]
    }

    #[test]
    fn test_category_id() {
        assert_eq!(category_id("Front"), "front");
        assert_eq!(category_id("Driver Side"), "driver-side");
        assert_eq!(category_id("Add-Ons  Damage"), "add-ons-damage");
        assert_eq!(category_id("Window\tSticker"), "window-sticker");
    }

    #[test]
    fn test_category_id_is_derived_from_label() {
        let a = PhotoCategory::new("Passenger Side", Vec::new());
        let b = PhotoCategory::new("Passenger Side", urls(&["x.jpg"]));
        assert_eq!(a.id(), "passenger-side");
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_build_sequence_order() {
        let sequence = build_sequence(&sample_categories());
        let flat: Vec<&str> = sequence.iter().map(|image| image.url.as_str()).collect();
        assert_eq!(
            flat,
            vec!["front-1.jpg", "front-2.jpg", "driver.jpg", "int-1.jpg", "int-2.jpg"]
        );

        assert_eq!(sequence[1].category_label, "Front");
        assert_eq!(sequence[1].index_within_category, 1);
        assert_eq!(sequence[2].category_label, "Driver Side");
        assert_eq!(sequence[2].index_within_category, 0);
    }

    #[test]
    fn test_build_sequence_empty() {
        assert!(build_sequence(&[]).is_empty());
        assert!(build_sequence(&[PhotoCategory::new("Front", Vec::new())]).is_empty());
    }

    #[test]
    fn test_select_by_url() {
        let sequence = build_sequence(&sample_categories());
        assert_eq!(select_by_url(&sequence, "driver.jpg"), Some(2));
        assert_eq!(select_by_url(&sequence, "int-2.jpg"), Some(4));
        assert_eq!(select_by_url(&sequence, "gone.jpg"), None);
    }

    #[test]
    fn test_select_by_url_returns_first_duplicate() {
        let categories = vec![
            PhotoCategory::new("Front", urls(&["a.jpg"])),
            PhotoCategory::new("Rear", urls(&["b.jpg", "a.jpg"])),
        ];
        let sequence = build_sequence(&categories);
        assert_eq!(select_by_url(&sequence, "a.jpg"), Some(0));
    }

    #[test]
    fn test_navigate_in_range() {
        let sequence = build_sequence(&sample_categories());
        assert_eq!(navigate(&sequence, 0, 1), 1);
        assert_eq!(navigate(&sequence, 3, 2), 2);
        assert_eq!(navigate(&sequence, 0, 4), 4);
    }

    #[test]
    fn test_navigate_boundaries_are_no_ops() {
        let sequence = build_sequence(&sample_categories());
        let len = sequence.len() as isize;

        assert_eq!(navigate(&sequence, 0, -1), 0);
        assert_eq!(navigate(&sequence, 4, len), 4);
        assert_eq!(navigate(&sequence, 2, 99), 2);
        assert_eq!(navigate(&[], 0, 0), 0);
    }

    #[test]
    fn test_display_sections_hide_policy() {
        let sections = display_sections(&sample_categories(), EmptyCategoryPolicy::Hide);
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["front", "driver-side", "interior"]);
        assert!(sections
            .iter()
            .all(|s| matches!(s.content, SectionContent::Images(_))));
    }

    #[test]
    fn test_display_sections_placeholder_policy() {
        let sections = display_sections(&sample_categories(), EmptyCategoryPolicy::Placeholder);
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[1].id, "rear");
        assert_eq!(sections[1].content, SectionContent::Placeholder);
        assert_eq!(
            sections[0].content,
            SectionContent::Images(urls(&["front-1.jpg", "front-2.jpg"]))
        );
    }

    #[test]
    fn test_policy_from_flag() {
        assert_eq!(EmptyCategoryPolicy::from_show_empty(false), EmptyCategoryPolicy::Hide);
        assert_eq!(
            EmptyCategoryPolicy::from_show_empty(true),
            EmptyCategoryPolicy::Placeholder
        );
    }

    #[test]
    fn test_gallery_rebuilds_only_on_change() {
        let mut gallery = Gallery::default();
        assert!(gallery.is_empty());
        assert_eq!(gallery.generation(), 0);

        assert!(gallery.set_categories(sample_categories()));
        assert_eq!(gallery.generation(), 1);
        assert_eq!(gallery.len(), 5);

        // Same content, new allocation: no rebuild
        assert!(!gallery.set_categories(sample_categories()));
        assert_eq!(gallery.generation(), 1);

        let mut changed = sample_categories();
        changed.pop();
        assert!(gallery.set_categories(changed));
        assert_eq!(gallery.generation(), 2);
        assert_eq!(gallery.len(), 3);
    }

    #[test]
    fn test_gallery_lookup() {
        let gallery = Gallery::new(sample_categories());
        assert_eq!(gallery.get(2).map(|image| image.url.as_str()), Some("driver.jpg"));
        assert_eq!(gallery.get(5), None);
        assert_eq!(gallery.category_of("int-1.jpg").map(|c| c.id()), Some("interior"));
        assert!(gallery.category_of("missing.jpg").is_none());
    }
}
