//! Pure lookups over feed snapshots.
//!
//! # Responsibility
//! - Resolve the currently selected delivery title across groups.
//! - Detect the special-carrier option and the gift line in a snapshot.
//!
//! # Invariants
//! - Functions here are pure and never allocate owned copies of feed data.
//! - Group order is significant: the first resolvable group wins.

use crate::model::cart::{LineItem, MerchandiseId};
use crate::model::delivery::DeliveryGroup;

/// Resolves the selected delivery-method title.
///
/// Iterates groups in order and returns the title of the first selected
/// option whose handle resolves and whose title is non-empty. Returns `None`
/// when no group has a resolvable selection, which callers treat as a
/// transitional snapshot.
pub fn resolve_delivery_title(groups: &[DeliveryGroup]) -> Option<&str> {
    groups
        .iter()
        .filter_map(DeliveryGroup::selected_option)
        .map(|option| option.title.as_str())
        .find(|title| !title.is_empty())
}

/// Returns whether any option in any group carries `marker` in its title.
pub fn has_carrier_option(groups: &[DeliveryGroup], marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    groups
        .iter()
        .flat_map(|group| group.delivery_options.iter())
        .any(|option| option.title.contains(marker))
}

/// Returns the first cart line carrying `merchandise_id`.
pub fn find_line_by_merchandise<'a>(
    lines: &'a [LineItem],
    merchandise_id: &MerchandiseId,
) -> Option<&'a LineItem> {
    lines
        .iter()
        .find(|line| &line.merchandise_id == merchandise_id)
}

/// Returns whether `merchandise_id` is present with quantity >= 1.
pub fn contains_merchandise(lines: &[LineItem], merchandise_id: &MerchandiseId) -> bool {
    lines
        .iter()
        .any(|line| &line.merchandise_id == merchandise_id && line.quantity >= 1)
}

#[cfg(test)]
mod tests {
    use super::{
        contains_merchandise, find_line_by_merchandise, has_carrier_option,
        resolve_delivery_title,
    };
    use crate::model::cart::{LineItem, MerchandiseId};
    use crate::model::delivery::{DeliveryGroup, DeliveryOption};

    fn group(options: &[(&str, &str)], selected: Option<&str>) -> DeliveryGroup {
        let group = DeliveryGroup::new(
            options
                .iter()
                .map(|(handle, title)| DeliveryOption::new(*handle, *title))
                .collect(),
        );
        match selected {
            Some(handle) => group.with_selected(handle),
            None => group,
        }
    }

    #[test]
    fn resolves_title_of_selected_option() {
        let groups = vec![group(
            &[("std", "Standard Shipping"), ("exp", "Express Shipping")],
            Some("exp"),
        )];
        assert_eq!(resolve_delivery_title(&groups), Some("Express Shipping"));
    }

    #[test]
    fn first_resolvable_group_wins() {
        let groups = vec![
            group(&[("a", "Alpha")], None),
            group(&[("b", "")], Some("b")),
            group(&[("c", "Gamma")], Some("c")),
            group(&[("d", "Delta")], Some("d")),
        ];
        assert_eq!(resolve_delivery_title(&groups), Some("Gamma"));
    }

    #[test]
    fn dangling_or_missing_selection_resolves_to_none() {
        assert_eq!(resolve_delivery_title(&[]), None);
        let groups = vec![group(&[("std", "Standard Shipping")], Some("gone"))];
        assert_eq!(resolve_delivery_title(&groups), None);
    }

    #[test]
    fn detects_carrier_marker_in_any_group() {
        let groups = vec![
            group(&[("std", "宅急便")], Some("std")),
            group(&[("np", "ネコポス (ポスト投函)")], None),
        ];
        assert!(has_carrier_option(&groups, "ネコポス"));
        assert!(!has_carrier_option(&groups, "ゆうパケット"));
        assert!(!has_carrier_option(&[], "ネコポス"));
    }

    #[test]
    fn empty_marker_never_matches() {
        let groups = vec![group(&[("std", "Standard Shipping")], None)];
        assert!(!has_carrier_option(&groups, ""));
    }

    #[test]
    fn finds_gift_line_and_ignores_zero_quantity() {
        let gift = MerchandiseId::new("gid://shopify/ProductVariant/1");
        let lines = vec![
            LineItem::new("line-1", "gid://shopify/ProductVariant/9", 2),
            LineItem::new("line-2", "gid://shopify/ProductVariant/1", 0),
        ];
        assert_eq!(
            find_line_by_merchandise(&lines, &gift).map(|line| line.id.as_str()),
            Some("line-2")
        );
        assert!(!contains_merchandise(&lines, &gift));
    }

    #[test]
    fn duplicate_gift_lines_still_count_as_present() {
        let gift = MerchandiseId::new("gid://shopify/ProductVariant/1");
        let lines = vec![
            LineItem::new("line-1", "gid://shopify/ProductVariant/1", 1),
            LineItem::new("line-2", "gid://shopify/ProductVariant/1", 3),
        ];
        assert!(contains_merchandise(&lines, &gift));
        assert_eq!(
            find_line_by_merchandise(&lines, &gift).map(|line| line.id.as_str()),
            Some("line-1")
        );
    }
}
