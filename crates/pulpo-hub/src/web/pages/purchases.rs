use axum::{
    extract::{RawQuery, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use pulpo_shared::schemas::Item;
use tracing::warn;

use super::{FormData, Nav, download, error_banner, escape, query_string, shell, today, with_query};
use crate::store::items::list_items;
use crate::views::purchases::{items_to_buy, purchase_list_filename, purchase_list_text, suppliers};
use crate::web::AppState;

pub async fn purchases_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Html<String> {
    let items = match list_items(&state.store).await {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "purchases could not load items");
            return shell(Nav::Purchases, &error_banner("Error cargando inventario."));
        }
    };
    let form = FormData::from_query(query.as_deref());
    let supplier = form.text("proveedor");

    let mut html = String::from(
        r#"<p class="muted intro">Genera la lista de insumos a comprar por proveedor.</p>"#,
    );
    if form.get("error").is_some() {
        html.push_str(&error_banner("Selecciona al menos un item."));
    }
    html.push_str(&supplier_picker(&suppliers(&items), &supplier));

    if supplier.is_empty() {
        html.push_str(
            r#"<div class="empty-state">🛒<p>Selecciona un proveedor para generar la lista de compras</p></div>"#,
        );
        return shell(Nav::Purchases, &html);
    }

    let to_buy = items_to_buy(&items, &supplier);
    html.push_str(&format!(
        r#"<p class="muted"><span class="mono strong">{}</span> items necesitan restock de <strong>{}</strong></p>"#,
        to_buy.len(),
        escape(&supplier)
    ));
    if to_buy.is_empty() {
        html.push_str(&format!(
            r#"<div class="empty-state ok">✓ Todo en orden con {}, no hay items por comprar</div>"#,
            escape(&supplier)
        ));
    } else {
        html.push_str(&purchase_table(&supplier, &to_buy));
    }
    shell(Nav::Purchases, &html)
}

fn supplier_picker(suppliers: &[String], selected: &str) -> String {
    let mut options = String::from(r#"<option value="">-- Seleccionar --</option>"#);
    for supplier in suppliers {
        let attr = if supplier == selected { " selected" } else { "" };
        options.push_str(&format!(
            r#"<option value="{v}"{attr}>{v}</option>"#,
            v = escape(supplier)
        ));
    }
    format!(
        r#"<form method="get" action="/compras" class="card picker">
<label>Seleccionar Proveedor<select name="proveedor">{options}</select></label>
<button type="submit">Ver</button>
</form>"#
    )
}

fn purchase_table(supplier: &str, items: &[&Item]) -> String {
    let rows: String = items
        .iter()
        .map(|item| {
            format!(
                r#"<tr><td><input type="checkbox" name="item" value="{id}" checked></td><td class="strong">{name}</td><td><span class="chip">{category}</span></td><td class="num">{stock}</td><td class="num">{ideal}</td><td class="num strong red-text">{quantity}</td><td class="muted">{unit}</td></tr>"#,
                id = escape(&item.id),
                name = escape(&item.name),
                category = escape(&item.category),
                stock = item.stock,
                ideal = item.stock_ideal,
                quantity = item.purchase_quantity,
                unit = escape(&item.unit),
            )
        })
        .collect();
    format!(
        r#"<form method="get" action="/compras/lista">
<input type="hidden" name="proveedor" value="{supplier}">
<div class="table-wrap card"><table>
<thead><tr><th></th><th>Nombre</th><th>Categoría</th><th class="num">Stock Actual</th><th class="num">Stock Ideal</th><th class="num">A Comprar</th><th>Unidad</th></tr></thead>
<tbody>{rows}</tbody>
</table></div>
<div class="action-bar">
<button type="submit" class="primary">Copiar Lista</button>
<button type="submit" formaction="/compras/lista.txt" class="secondary">Descargar TXT</button>
</div>
</form>"#,
        supplier = escape(supplier),
    )
}

/// Selected items for the list, or a redirect back when nothing is usable.
async fn selection(state: &AppState, query: Option<&str>) -> Result<(String, Vec<Item>), Response> {
    let form = FormData::from_query(query);
    let supplier = form.text("proveedor");
    if supplier.is_empty() {
        return Err(Redirect::to("/compras").into_response());
    }
    let back = with_query("/compras", &query_string([("proveedor", supplier.as_str())]));

    let items = list_items(&state.store).await.map_err(|e| {
        warn!(error = %e, "purchase list could not load items");
        Redirect::to(&back).into_response()
    })?;
    let selected = form.all("item");
    let chosen: Vec<Item> = items_to_buy(&items, &supplier)
        .into_iter()
        .filter(|i| selected.contains(&i.id))
        .cloned()
        .collect();
    if chosen.is_empty() {
        let query = query_string([("proveedor", supplier.as_str()), ("error", "seleccion")]);
        return Err(Redirect::to(&with_query("/compras", &query)).into_response());
    }
    Ok((supplier, chosen))
}

pub async fn list_preview(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let (supplier, chosen) = match selection(&state, query.as_deref()).await {
        Ok(selection) => selection,
        Err(redirect) => return redirect,
    };
    let refs: Vec<&Item> = chosen.iter().collect();
    let text = purchase_list_text(&supplier, &refs, today());
    let back = with_query("/compras", &query_string([("proveedor", supplier.as_str())]));
    let html = format!(
        r#"<div class="card">
<p class="muted"><span class="mono strong">{count}</span> items seleccionados</p>
<textarea id="lista" class="mono" rows="{rows}" readonly>{text}</textarea>
<div class="action-bar">
<button type="button" class="primary" onclick="navigator.clipboard.writeText(document.getElementById('lista').value)">Copiar al portapapeles</button>
<a class="button secondary" href="{back}">Volver</a>
</div>
</div>"#,
        count = refs.len(),
        rows = refs.len() + 6,
        text = escape(&text),
        back = escape(&back),
    );
    shell(Nav::Purchases, &html).into_response()
}

pub async fn list_download(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let (supplier, chosen) = match selection(&state, query.as_deref()).await {
        Ok(selection) => selection,
        Err(redirect) => return redirect,
    };
    let refs: Vec<&Item> = chosen.iter().collect();
    let date = today();
    download(
        "text/plain; charset=utf-8",
        &purchase_list_filename(&supplier, date),
        purchase_list_text(&supplier, &refs, date),
    )
}
