use chrono::NaiveDate;
use pulpo_shared::schemas::Item;

use super::format_short_date;

const RULE: &str = "─────────────────";

/// Suppliers named by at least one item, sorted.
pub fn suppliers(items: &[Item]) -> Vec<String> {
    let mut names: Vec<String> = items
        .iter()
        .map(|i| i.supplier.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Items from `supplier` with something left to buy.
pub fn items_to_buy<'a>(items: &'a [Item], supplier: &str) -> Vec<&'a Item> {
    if supplier.is_empty() {
        return Vec::new();
    }
    items
        .iter()
        .filter(|i| i.supplier == supplier && i.purchase_quantity > 0.0)
        .collect()
}

/// Plain-text shopping list, ready to paste into a chat with the supplier.
pub fn purchase_list_text(supplier: &str, items: &[&Item], date: NaiveDate) -> String {
    let mut text = format!("📦 Lista de Compras - {supplier}\n");
    text.push_str(&format!("Fecha: {}\n", format_short_date(date)));
    text.push_str(RULE);
    text.push('\n');
    for item in items {
        text.push_str(&format!(
            "• {} — {} {} (actual: {})\n",
            item.name, item.purchase_quantity, item.unit, item.stock
        ));
    }
    text.push_str(RULE);
    text.push('\n');
    text.push_str(&format!("Total: {} items\n", items.len()));
    text
}

/// `lista_compras_{supplier}_{yyyy-mm-dd}.txt`, whitespace runs in the
/// supplier name collapsed to `_`.
pub fn purchase_list_filename(supplier: &str, date: NaiveDate) -> String {
    let mut name = String::with_capacity(supplier.len());
    let mut in_space = false;
    for c in supplier.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else {
            name.push(c);
            in_space = false;
        }
    }
    format!("lista_compras_{name}_{}.txt", date.format("%Y-%m-%d"))
}
