use axum::{
    extract::{RawQuery, State},
    response::Html,
};
use pulpo_shared::schemas::Item;
use tracing::warn;

use super::{FormData, Nav, alert_badge, error_banner, escape, shell};
use crate::store::items::list_items;
use crate::views::dashboard::{DashboardSummary, Panel};
use crate::web::AppState;

struct Card {
    panel: Panel,
    accent: &'static str,
    caption: &'static str,
}

const CARDS: [Card; 4] = [
    Card { panel: Panel::FastDepleting, accent: "red", caption: "🔥 Se acaban rápido" },
    Card { panel: Panel::SlowMoving, accent: "blue", caption: "🐌 Más lentos" },
    Card { panel: Panel::Overstock, accent: "amber", caption: "📈 Sobre exceso" },
    Card { panel: Panel::Understock, accent: "red", caption: "📉 En déficit" },
];

pub async fn dashboard_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Html<String> {
    let items = match list_items(&state.store).await {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "dashboard could not load items");
            return shell(
                Nav::Dashboard,
                &error_banner("Error cargando datos del inventario."),
            );
        }
    };
    let form = FormData::from_query(query.as_deref());
    let summary = DashboardSummary::from_items(&items);

    let mut html = String::from(r#"<div class="kpi-grid">"#);
    for card in &CARDS {
        html.push_str(&format!(
            r#"<a class="kpi {accent}" href="/dashboard?panel={key}"><div class="kpi-value mono">{count}</div><div class="kpi-label">{title}</div><div class="kpi-caption">{caption}</div></a>"#,
            accent = card.accent,
            key = card.panel.as_str(),
            count = summary.panel(card.panel).len(),
            title = card.panel.title(),
            caption = card.caption,
        ));
    }
    html.push_str("</div>");
    html.push_str(&critical_table(&summary.critical));

    if let Some(panel) = form.get("panel").and_then(Panel::parse) {
        html.push_str(&panel_modal(panel, summary.panel(panel)));
    }

    shell(Nav::Dashboard, &html)
}

fn critical_table(items: &[&Item]) -> String {
    let mut rows = String::new();
    if items.is_empty() {
        rows.push_str(
            r#"<tr><td colspan="7" class="empty">No hay alertas críticas en este momento.</td></tr>"#,
        );
    }
    for item in items {
        rows.push_str(&format!(
            r#"<tr><td class="strong">{name}</td><td class="muted">{category}</td><td class="num">{stock}</td><td class="num muted">{min}</td><td class="num muted">{ideal}</td><td class="num">{days:.1}</td><td><span class="{badge}">{alert}</span></td></tr>"#,
            name = escape(&item.name),
            category = escape(&item.category),
            stock = item.stock,
            min = item.min_level,
            ideal = item.stock_ideal,
            days = item.days_remaining,
            badge = alert_badge(item.alert_level.as_str()),
            alert = escape(item.alert_level.as_str()),
        ));
    }
    format!(
        r#"<section class="card">
<h2>⚠️ Alertas Críticas</h2>
<div class="table-wrap"><table>
<thead><tr><th>Nombre</th><th>Categoría</th><th class="num">Stock</th><th class="num">Min</th><th class="num">Ideal</th><th class="num">Días Rest.</th><th>Estado</th></tr></thead>
<tbody>{rows}</tbody>
</table></div>
</section>"#
    )
}

/// Extra columns shown for each drill-down list.
fn panel_columns(panel: Panel) -> &'static [&'static str] {
    match panel {
        Panel::FastDepleting => &["Días Restantes", "Alerta"],
        Panel::SlowMoving => &["Días Restantes", "Consumo Diario"],
        Panel::Overstock => &["Stock Ideal", "Diferencia"],
        Panel::Understock => &["Stock Ideal", "A Comprar"],
    }
}

fn panel_cells(panel: Panel, item: &Item) -> String {
    match panel {
        Panel::FastDepleting => format!(
            r#"<td class="num">{:.1}</td><td><span class="{}">{}</span></td>"#,
            item.days_remaining,
            alert_badge(item.alert_level.as_str()),
            escape(item.alert_level.as_str()),
        ),
        Panel::SlowMoving => format!(
            r#"<td class="num">{:.1}</td><td class="num muted">{:.1}</td>"#,
            item.days_remaining, item.daily_consumption,
        ),
        Panel::Overstock => format!(
            r#"<td class="num muted">{}</td><td class="num amber-text">+{:.0}</td>"#,
            item.stock_ideal,
            item.stock - item.stock_ideal,
        ),
        Panel::Understock => format!(
            r#"<td class="num muted">{}</td><td class="num red-text">{}</td>"#,
            item.stock_ideal, item.purchase_quantity,
        ),
    }
}

fn panel_modal(panel: Panel, items: &[&Item]) -> String {
    let content = if items.is_empty() {
        r#"<p class="empty">No hay elementos para mostrar en esta categoría.</p>"#.to_string()
    } else {
        let head: String = panel_columns(panel)
            .iter()
            .map(|c| format!(r#"<th class="num">{c}</th>"#))
            .collect();
        let rows: String = items
            .iter()
            .map(|item| {
                format!(
                    r#"<tr><td class="strong">{}</td><td class="num">{}</td>{}</tr>"#,
                    escape(&item.name),
                    item.stock,
                    panel_cells(panel, item)
                )
            })
            .collect();
        format!(
            r#"<div class="table-wrap"><table><thead><tr><th>Nombre</th><th class="num">Stock</th>{head}</tr></thead><tbody>{rows}</tbody></table></div>"#
        )
    };
    format!(
        r#"<div class="modal-backdrop"><div class="modal">
<div class="modal-header"><h3>{title}</h3><a class="close" href="/dashboard">✕</a></div>
<div class="modal-body">{content}</div>
</div></div>"#,
        title = panel.title(),
    )
}
