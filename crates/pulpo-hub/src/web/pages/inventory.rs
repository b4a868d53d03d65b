use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use pulpo_shared::schemas::{AlertLevel, Item, ItemDraft, StockStatus, deactivate_item_fields};
use tracing::{error, info, warn};

use super::{
    FormData, Nav, alert_badge, download, error_banner, escape, query_string, shell, stock_badge,
    today, with_query,
};
use crate::export::{
    XLSX_CONTENT_TYPE, inventory_csv, inventory_csv_filename, inventory_xlsx,
    inventory_xlsx_filename,
};
use crate::store::items::{create_item as store_create, list_items, update_item as store_update};
use crate::views::inventory::{FilterOptions, InventoryFilter, Pagination, filter_items, paginate};
use crate::web::AppState;

fn filter_from(form: &FormData) -> InventoryFilter {
    InventoryFilter {
        search: form.text("q"),
        category: form.text("categoria"),
        supplier: form.text("proveedor"),
        stock_status: form.text("estado"),
        alert_level: form.text("alerta"),
    }
}

/// Query string that brings the table back to the same filters and page.
fn list_query(filter: &InventoryFilter, page: usize) -> String {
    let page = page.to_string();
    let mut pairs = filter.query_pairs();
    if page != "1" {
        pairs.push(("page", page.as_str()));
    }
    query_string(pairs)
}

/// `list_query` plus one more pair, e.g. to open a dialog.
fn list_query_with(filter: &InventoryFilter, page: usize, key: &str, value: &str) -> String {
    let base = list_query(filter, page);
    let extra = query_string([(key, value)]);
    if base.is_empty() {
        extra
    } else {
        format!("{base}&{extra}")
    }
}

fn error_message(code: &str) -> &'static str {
    match code {
        "requerido" => "Nombre y Unidad Base son obligatorios.",
        "desactivar" => "Error al desactivar item.",
        _ => "Error al guardar item.",
    }
}

pub async fn inventory_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Html<String> {
    let items = match list_items(&state.store).await {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "inventory could not load items");
            return shell(Nav::Inventory, &error_banner("Error cargando inventario."));
        }
    };
    let form = FormData::from_query(query.as_deref());
    let filter = filter_from(&form);
    let options = FilterOptions::from_items(&items);
    let filtered = filter_items(&items, &filter);
    let (page_items, pagination) = paginate(&filtered, form.page());

    let mut html = String::new();
    if let Some(code) = form.get("error") {
        html.push_str(&error_banner(error_message(code)));
    }
    html.push_str(&toolbar(&filter, pagination.page));
    html.push_str(&filters_form(&filter, &options));
    html.push_str(&format!(
        r#"<p class="count">Mostrando {} items en total</p>"#,
        filtered.len()
    ));
    html.push_str(&items_table(page_items, &filter, pagination.page));
    html.push_str(&pagination_links(&filter, pagination));

    if form.get("new").is_some() {
        html.push_str(&item_modal(None, &ItemDraft::default(), &options, &filter, pagination.page));
    } else if let Some(item) = form.get("edit").and_then(|id| find(&items, id)) {
        html.push_str(&item_modal(
            Some(&item.id),
            &ItemDraft::from_item(item),
            &options,
            &filter,
            pagination.page,
        ));
    } else if let Some(item) = form.get("delete").and_then(|id| find(&items, id)) {
        html.push_str(&delete_modal(item, &filter, pagination.page));
    }

    shell(Nav::Inventory, &html)
}

fn find<'a>(items: &'a [Item], id: &str) -> Option<&'a Item> {
    items.iter().find(|i| i.id == id)
}

fn toolbar(filter: &InventoryFilter, page: usize) -> String {
    format!(
        r#"<div class="toolbar"><a class="button secondary" href="{csv}">Exportar CSV</a><a class="button secondary" href="{xlsx}">Exportar Excel</a><a class="button primary" href="{new}">Nuevo Item</a></div>"#,
        csv = escape(&with_query("/inventario/export.csv", &list_query(filter, 1))),
        xlsx = escape(&with_query("/inventario/export.xlsx", &list_query(filter, 1))),
        new = escape(&with_query("/inventario", &list_query_with(filter, page, "new", "1"))),
    )
}

fn select(name: &str, placeholder: &str, options: &[String], selected: &str) -> String {
    let mut html = format!(r#"<select name="{name}"><option value="">{placeholder}</option>"#);
    for option in options {
        let attr = if option == selected { " selected" } else { "" };
        html.push_str(&format!(
            r#"<option value="{v}"{attr}>{v}</option>"#,
            v = escape(option)
        ));
    }
    html.push_str("</select>");
    html
}

fn filters_form(filter: &InventoryFilter, options: &FilterOptions) -> String {
    let statuses: Vec<String> = StockStatus::FILTER_OPTIONS
        .iter()
        .map(|s| s.as_str().to_string())
        .collect();
    let alerts: Vec<String> = AlertLevel::FILTER_OPTIONS
        .iter()
        .map(|a| a.as_str().to_string())
        .collect();
    format!(
        r#"<form method="get" action="/inventario" class="filters">
<input type="search" name="q" placeholder="Buscar item..." value="{search}">
{categories}{suppliers}{statuses}{alerts}
<button type="submit">Filtrar</button>
</form>"#,
        search = escape(&filter.search),
        categories = select("categoria", "Todas las Categorías", &options.categories, &filter.category),
        suppliers = select("proveedor", "Todos los Proveedores", &options.suppliers, &filter.supplier),
        statuses = select("estado", "Cualquier Estado", &statuses, &filter.stock_status),
        alerts = select("alerta", "Cualquier Alerta", &alerts, &filter.alert_level),
    )
}

fn items_table(items: &[&Item], filter: &InventoryFilter, page: usize) -> String {
    let mut rows = String::new();
    if items.is_empty() {
        rows.push_str(r#"<tr><td colspan="10" class="empty">No se encontraron items.</td></tr>"#);
    }
    for item in items {
        let edit = with_query("/inventario", &list_query_with(filter, page, "edit", &item.id));
        let delete = with_query("/inventario", &list_query_with(filter, page, "delete", &item.id));
        rows.push_str(&format!(
            r#"<tr>
<td class="strong">{name}</td><td>{category}</td><td class="muted">{subcategory}</td><td class="muted">{unit}</td>
<td class="num strong">{stock}</td><td class="num muted">{min} / {ideal}</td>
<td><span class="{status_badge}">{status}</span></td><td class="muted">{supplier}</td>
<td class="center"><span class="{alert_badge}">{alert}</span></td>
<td class="actions"><a href="{edit}" title="Editar">Editar</a><a href="{delete}" class="danger" title="Eliminar">Eliminar</a></td>
</tr>"#,
            name = escape(&item.name),
            category = escape(&item.category),
            subcategory = escape(&item.subcategory),
            unit = escape(&item.unit),
            stock = item.stock,
            min = item.min_level,
            ideal = item.stock_ideal,
            status_badge = stock_badge(item.stock_status.as_str()),
            status = escape(item.stock_status.as_str()),
            supplier = escape(&item.supplier),
            alert_badge = alert_badge(item.alert_level.as_str()),
            alert = escape(item.alert_level.as_str()),
            edit = escape(&edit),
            delete = escape(&delete),
        ));
    }
    format!(
        r#"<div class="table-wrap card"><table>
<thead><tr><th>Nombre</th><th>Categoría</th><th>Subcategoría</th><th>Ud.</th><th class="num">Stock</th><th class="num">Min / Ideal</th><th>Estado</th><th>Proveedor</th><th class="center">Alerta</th><th class="center">Acciones</th></tr></thead>
<tbody>{rows}</tbody>
</table></div>"#
    )
}

fn pagination_links(filter: &InventoryFilter, pagination: Pagination) -> String {
    if pagination.total_pages <= 1 {
        return String::new();
    }
    let link = |page: usize, label: &str, enabled: bool| {
        if enabled {
            format!(
                r#"<a class="button secondary" href="{}">{label}</a>"#,
                escape(&with_query("/inventario", &list_query(filter, page)))
            )
        } else {
            format!(r#"<span class="button secondary disabled">{label}</span>"#)
        }
    };
    format!(
        r#"<div class="pagination"><span>Página {page} de {total}</span>{prev}{next}</div>"#,
        page = pagination.page,
        total = pagination.total_pages,
        prev = link(pagination.page.saturating_sub(1), "‹", pagination.has_previous()),
        next = link(pagination.page + 1, "›", pagination.has_next()),
    )
}

/// Hidden inputs that carry the table state through a form post.
fn state_inputs(filter: &InventoryFilter, page: usize) -> String {
    let page = page.to_string();
    let mut pairs = filter.query_pairs();
    pairs.push(("page", page.as_str()));
    pairs
        .into_iter()
        .map(|(k, v)| format!(r#"<input type="hidden" name="{k}" value="{}">"#, escape(v)))
        .collect()
}

fn datalist(id: &str, values: &[String]) -> String {
    let options: String = values
        .iter()
        .map(|v| format!(r#"<option value="{}">"#, escape(v)))
        .collect();
    format!(r#"<datalist id="{id}">{options}</datalist>"#)
}

fn number_input(label: &str, name: &str, value: f64) -> String {
    format!(
        r#"<label>{label}<input type="number" step="0.01" name="{name}" value="{value}" class="mono"></label>"#
    )
}

fn item_modal(
    id: Option<&str>,
    draft: &ItemDraft,
    options: &FilterOptions,
    filter: &InventoryFilter,
    page: usize,
) -> String {
    let (title, action) = match id {
        Some(id) => ("Editar Item", format!("/inventario/items/{}", escape(id))),
        None => ("Nuevo Item", "/inventario/items".to_string()),
    };
    let initial_stock = if id.is_none() {
        number_input("Stock Inicial", "stock_inicial", draft.initial_stock)
    } else {
        String::new()
    };
    let close = escape(&with_query("/inventario", &list_query(filter, page)));
    format!(
        r#"<div class="modal-backdrop"><div class="modal">
<div class="modal-header"><h3>{title}</h3><a class="close" href="{close}">✕</a></div>
<form method="post" action="{action}" class="modal-body form-grid">
{state}
<label>Nombre <span class="required">*</span><input type="text" name="nombre" value="{name}" required></label>
<label>Unidad Base <span class="required">*</span><input type="text" name="unidad_base" list="unitsList" value="{unit}" required></label>
{units}
<label>Categoría<input type="text" name="categoria" list="catList" value="{category}"></label>
{categories}
<label>Subcategoría<input type="text" name="subcategoria" value="{subcategory}"></label>
<label>Proveedor<input type="text" name="proveedor" list="provList" value="{supplier}"></label>
{suppliers}
{min_level}{stock_ideal}{initial_stock}{kitchen}{ground_bar}{rooftop_bar}
<div class="modal-actions"><a class="button secondary" href="{close}">Cancelar</a><button type="submit" class="primary">Guardar</button></div>
</form>
</div></div>"#,
        state = state_inputs(filter, page),
        name = escape(&draft.name),
        unit = escape(&draft.unit),
        units = datalist("unitsList", &options.units),
        category = escape(&draft.category),
        categories = datalist("catList", &options.categories),
        subcategory = escape(&draft.subcategory),
        supplier = escape(&draft.supplier),
        suppliers = datalist("provList", &options.suppliers),
        min_level = number_input("Mínimo Nivel", "min_level", draft.min_level),
        stock_ideal = number_input("Stock Ideal", "stock_ideal", draft.stock_ideal),
        kitchen = number_input("Límite Cocina", "limite_cocina", draft.kitchen_limit),
        ground_bar = number_input("Límite Bar PB", "limite_bar_pb", draft.ground_bar_limit),
        rooftop_bar = number_input("Límite Bar Rooftop", "limite_bar_rooftop", draft.rooftop_bar_limit),
    )
}

fn delete_modal(item: &Item, filter: &InventoryFilter, page: usize) -> String {
    let close = escape(&with_query("/inventario", &list_query(filter, page)));
    format!(
        r#"<div class="modal-backdrop"><div class="modal small">
<h3>¿Confirmar Desactivación?</h3>
<p class="muted">El item <strong>{name}</strong> será marcado como inactivo y no aparecerá en las tablas principales.</p>
<form method="post" action="/inventario/items/{id}/desactivar" class="modal-actions">
{state}
<a class="button secondary" href="{close}">Cancelar</a><button type="submit" class="danger">Desactivar</button>
</form>
</div></div>"#,
        name = escape(&item.name),
        id = escape(&item.id),
        state = state_inputs(filter, page),
    )
}

fn draft_from(form: &FormData) -> ItemDraft {
    ItemDraft {
        name: form.text("nombre"),
        unit: form.text("unidad_base"),
        category: form.text("categoria"),
        subcategory: form.text("subcategoria"),
        supplier: form.text("proveedor"),
        min_level: form.number("min_level"),
        stock_ideal: form.number("stock_ideal"),
        initial_stock: form.number("stock_inicial"),
        kitchen_limit: form.number("limite_cocina"),
        ground_bar_limit: form.number("limite_bar_pb"),
        rooftop_bar_limit: form.number("limite_bar_rooftop"),
    }
}

/// Redirect back to the table, optionally reopening a dialog with an error.
fn back(form: &FormData, reopen: Option<(&str, &str)>, error: Option<&str>) -> Response {
    let filter = filter_from(form);
    let mut query = list_query(&filter, form.page());
    let mut extra: Vec<(&str, &str)> = Vec::new();
    if let Some(pair) = reopen {
        extra.push(pair);
    }
    if let Some(code) = error {
        extra.push(("error", code));
    }
    if !extra.is_empty() {
        let extra = query_string(extra);
        query = if query.is_empty() { extra } else { format!("{query}&{extra}") };
    }
    Redirect::to(&with_query("/inventario", &query)).into_response()
}

pub async fn create_item(State(state): State<AppState>, body: Bytes) -> Response {
    let form = FormData::parse(&body);
    let draft = draft_from(&form);
    if draft.missing_required().is_some() {
        return back(&form, Some(("new", "1")), Some("requerido"));
    }
    match store_create(&state.store, draft.to_fields(true)).await {
        Ok(record) => {
            info!(id = %record.id, "item created");
            back(&form, None, None)
        }
        Err(e) => {
            warn!(error = %e, "item create failed");
            back(&form, Some(("new", "1")), Some("guardar"))
        }
    }
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let form = FormData::parse(&body);
    let draft = draft_from(&form);
    if draft.missing_required().is_some() {
        return back(&form, Some(("edit", id.as_str())), Some("requerido"));
    }
    match store_update(&state.store, &id, draft.to_fields(false)).await {
        Ok(_) => back(&form, None, None),
        Err(e) => {
            warn!(error = %e, id = %id, "item update failed");
            back(&form, Some(("edit", id.as_str())), Some("guardar"))
        }
    }
}

pub async fn deactivate_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let form = FormData::parse(&body);
    match store_update(&state.store, &id, deactivate_item_fields()).await {
        Ok(_) => {
            info!(id = %id, "item deactivated");
            back(&form, None, None)
        }
        Err(e) => {
            warn!(error = %e, id = %id, "item deactivate failed");
            back(&form, None, Some("desactivar"))
        }
    }
}

/// Items matching the filter in the query, or the redirect to send instead.
async fn export_rows(
    state: &AppState,
    query: Option<&str>,
) -> Result<(Vec<Item>, InventoryFilter), Response> {
    let form = FormData::from_query(query);
    let filter = filter_from(&form);
    match list_items(&state.store).await {
        Ok(items) => Ok((items, filter)),
        Err(e) => {
            warn!(error = %e, "export could not load items");
            Err(Redirect::to("/inventario").into_response())
        }
    }
}

fn back_to_table(filter: &InventoryFilter) -> Response {
    Redirect::to(&with_query("/inventario", &list_query(filter, 1))).into_response()
}

pub async fn export_csv(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let (items, filter) = match export_rows(&state, query.as_deref()).await {
        Ok(rows) => rows,
        Err(redirect) => return redirect,
    };
    let filtered = filter_items(&items, &filter);
    match inventory_csv(&filtered) {
        Some(csv) => download("text/csv; charset=utf-8", &inventory_csv_filename(today()), csv),
        None => back_to_table(&filter),
    }
}

pub async fn export_xlsx(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let (items, filter) = match export_rows(&state, query.as_deref()).await {
        Ok(rows) => rows,
        Err(redirect) => return redirect,
    };
    let filtered = filter_items(&items, &filter);
    match inventory_xlsx(&filtered) {
        Ok(Some(bytes)) => download(XLSX_CONTENT_TYPE, &inventory_xlsx_filename(today()), bytes),
        Ok(None) => back_to_table(&filter),
        Err(e) => {
            error!(error = %e, "failed to build workbook");
            back_to_table(&filter)
        }
    }
}
