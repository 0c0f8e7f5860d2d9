//! Rendering of the aggregated shopping list document.
//!
//! The grouping and summing happens in SQL (see the download handler); this
//! module turns the grouped rows into the downloadable text document.

/// One aggregated line: ingredient name, measurement unit, summed amount.
pub type ShoppingListRow = (String, String, i64);

const HEADER: &str = "Shopping list:";

/// Formats grouped rows as a plain-text document, one `{name} ({unit}) -
/// {total}` line per ingredient. Rows are sorted by (name, unit) so the
/// output is stable for a given cart.
pub fn render(mut rows: Vec<ShoppingListRow>) -> String {
    rows.sort();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(HEADER.to_string());
    for (name, unit, total) in rows {
        lines.push(format!("{} ({}) - {}", name, unit, total));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, unit: &str, total: i64) -> ShoppingListRow {
        (name.to_string(), unit.to_string(), total)
    }

    #[test]
    fn test_empty_cart_renders_header_only() {
        assert_eq!(render(vec![]), "Shopping list:");
    }

    #[test]
    fn test_single_row() {
        let doc = render(vec![row("Salt", "g", 8)]);
        assert_eq!(doc, "Shopping list:\nSalt (g) - 8");
    }

    #[test]
    fn test_rows_sorted_by_name_then_unit() {
        let doc = render(vec![
            row("Sugar", "g", 100),
            row("Milk", "ml", 250),
            row("Milk", "l", 1),
        ]);
        assert_eq!(
            doc,
            "Shopping list:\nMilk (l) - 1\nMilk (ml) - 250\nSugar (g) - 100"
        );
    }

    #[test]
    fn test_same_ingredient_different_units_stay_separate() {
        let doc = render(vec![row("Flour", "g", 500), row("Flour", "cup", 2)]);
        assert_eq!(doc, "Shopping list:\nFlour (cup) - 2\nFlour (g) - 500");
    }

    #[test]
    fn test_render_is_deterministic() {
        let rows = vec![row("B", "g", 1), row("A", "g", 2), row("C", "g", 3)];
        assert_eq!(render(rows.clone()), render(rows));
    }
}
