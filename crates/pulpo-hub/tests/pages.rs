mod common;

use common::{PASSWORD, item, location, session_cookie, start};
use serde_json::json;

#[tokio::test]
async fn pages_redirect_to_login_without_session() {
    let hub = start().await;
    for path in ["/dashboard", "/inventario", "/compras", "/tareas"] {
        let resp = hub.http.get(hub.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 303, "{path}");
        assert_eq!(location(&resp), "/", "{path}");
    }
    let login = hub.http.get(hub.url("/")).send().await.unwrap();
    assert_eq!(login.status(), 200);
    assert!(login.text().await.unwrap().contains(r#"name="password""#));
}

#[tokio::test]
async fn login_form_starts_a_session() {
    let hub = start().await;

    let wrong = hub
        .http
        .post(hub.url("/login"))
        .form(&[("password", "nope")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&wrong), "/?error=1");
    let page = hub.http.get(hub.url("/?error=1")).send().await.unwrap();
    assert!(page.text().await.unwrap().contains("Contraseña incorrecta"));

    let resp = hub
        .http
        .post(hub.url("/login"))
        .form(&[("password", PASSWORD)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/dashboard");
    let cookie = session_cookie(&resp).unwrap();

    let home = hub
        .http
        .get(hub.url("/"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(location(&home), "/dashboard");

    let logout = hub
        .http
        .post(hub.url("/logout"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(location(&logout), "/");
    assert!(
        logout.headers()["set-cookie"]
            .to_str()
            .unwrap()
            .contains("Max-Age=0")
    );
}

#[tokio::test]
async fn dashboard_lists_critical_items() {
    let hub = start().await;
    hub.fake.seed(
        "Items",
        vec![
            item("rec1", "Limones", json!({"nivel_alerta": "AGOTADO", "dias_stock_restante": 0})),
            item("rec2", "Hielo", json!({"nivel_alerta": "OK", "dias_stock_restante": 40})),
            item("rec3", "Menta", json!({"nivel_alerta": "URGENTE", "dias_stock_restante": 1.5})),
        ],
    );
    let cookie = hub.login().await;
    let html = hub
        .http
        .get(hub.url("/dashboard"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Alertas Críticas"));
    assert!(html.contains("Limones"));
    assert!(html.contains("Menta"));
    let critical = html.split("Alertas Críticas").nth(1).unwrap();
    assert!(!critical.contains("Hielo"));
}

#[tokio::test]
async fn dashboard_shows_banner_when_store_fails() {
    let hub = common::start_with(|api_url| pulpo_hub::config::AirtableSettings {
        api_key: None,
        api_url: api_url.to_string(),
        ..Default::default()
    })
    .await;
    let cookie = hub.login().await;
    let html = hub
        .http
        .get(hub.url("/dashboard"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Error cargando datos del inventario."));
}

#[tokio::test]
async fn inventory_filters_and_exports_csv() {
    let hub = start().await;
    hub.fake.seed(
        "Items",
        vec![
            item("rec1", "Limones", json!({"categoria": "Frutas", "proveedor": "Lupita"})),
            item("rec2", "Ron \"Añejo\"", json!({"categoria": "Licores"})),
            item("rec3", "Limas", json!({"categoria": "Frutas"})),
        ],
    );
    let cookie = hub.login().await;

    let html = hub
        .http
        .get(hub.url("/inventario?categoria=Frutas"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Mostrando 2 items en total"));
    assert!(html.contains("Limones"));
    assert!(!html.contains("Añejo"));

    let resp = hub
        .http
        .get(hub.url("/inventario/export.csv?q=ron"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert!(
        resp.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .contains("inventario_pulpo_")
    );
    let csv = resp.text().await.unwrap();
    let mut lines = csv.trim_start_matches('\u{feff}').lines();
    assert!(lines.next().unwrap().starts_with("Nombre,Categoría"));
    let row = lines.next().unwrap();
    assert!(row.starts_with(r#""Ron ""Añejo""","Licores""#));
    assert!(lines.next().is_none());
}

#[tokio::test]
async fn inventory_exports_filtered_workbook() {
    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use std::io::Cursor;

    let hub = start().await;
    hub.fake.seed(
        "Items",
        vec![
            item("rec1", "Limones", json!({"categoria": "Frutas", "existencias": 7})),
            item("rec2", "Ron", json!({"categoria": "Licores"})),
        ],
    );
    let cookie = hub.login().await;

    let html = hub
        .http
        .get(hub.url("/inventario?categoria=Frutas"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("/inventario/export.xlsx?categoria=Frutas"));

    let resp = hub
        .http
        .get(hub.url("/inventario/export.xlsx?categoria=Frutas"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = resp.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("inventario_pulpo_negro_"));
    assert!(disposition.contains(".xlsx"));

    let bytes = resp.bytes().await.unwrap().to_vec();
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Inventario").unwrap();
    let mut rows = range.rows();
    let header = rows.next().unwrap();
    assert_eq!(header[0], Data::String("Nombre".into()));
    assert_eq!(header[9], Data::String("Nivel Alerta".into()));
    let row = rows.next().unwrap();
    assert_eq!(row[0], Data::String("Limones".into()));
    assert_eq!(row[4], Data::Float(7.0));
    assert!(rows.next().is_none());

    let empty = hub
        .http
        .get(hub.url("/inventario/export.xlsx?q=zzz"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), 303);
    assert!(location(&empty).starts_with("/inventario"));
}

#[tokio::test]
async fn empty_export_goes_back_to_the_table() {
    let hub = start().await;
    hub.fake.seed("Items", vec![item("rec1", "Limones", json!({}))]);
    let cookie = hub.login().await;
    let resp = hub
        .http
        .get(hub.url("/inventario/export.csv?q=zzz"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
    assert!(location(&resp).starts_with("/inventario"));
}

#[tokio::test]
async fn item_form_creates_and_deactivates() {
    let hub = start().await;
    hub.fake.seed("Items", vec![item("rec1", "Limones", json!({}))]);
    let cookie = hub.login().await;

    let missing = hub
        .http
        .post(hub.url("/inventario/items"))
        .header("cookie", &cookie)
        .form(&[("nombre", "Hielo")])
        .send()
        .await
        .unwrap();
    assert!(location(&missing).contains("error=requerido"));
    assert!(hub.fake.created.lock().unwrap().is_empty());

    let created = hub
        .http
        .post(hub.url("/inventario/items"))
        .header("cookie", &cookie)
        .form(&[
            ("nombre", "Hielo"),
            ("unidad_base", "kg"),
            ("stock_inicial", "40"),
            ("min_level", "2,5"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 303);
    assert!(!location(&created).contains("error"));
    {
        let created = hub.fake.created.lock().unwrap();
        let fields = &created[0].1;
        assert_eq!(fields["activo"], true);
        assert_eq!(fields["stock_inicial"], 40.0);
        assert_eq!(fields["min_level"], 2.5);
    }

    let resp = hub
        .http
        .post(hub.url("/inventario/items/rec1/desactivar"))
        .header("cookie", &cookie)
        .form(&[("page", "1")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
    let patched = hub.fake.patched.lock().unwrap();
    assert_eq!(patched[0].1, "rec1");
    assert_eq!(patched[0].2, json!({"activo": false}));
}

#[tokio::test]
async fn purchase_list_downloads_selected_items() {
    let hub = start().await;
    hub.fake.seed(
        "Items",
        vec![
            item(
                "rec1",
                "Limones",
                json!({"proveedor": "Frutas Lupita", "cantidad_a_comprar": 30, "unidad_base": "kg", "existencias": 4}),
            ),
            item(
                "rec2",
                "Limas",
                json!({"proveedor": "Frutas Lupita", "cantidad_a_comprar": 10, "unidad_base": "kg"}),
            ),
            item("rec3", "Menta", json!({"proveedor": "Frutas Lupita"})),
        ],
    );
    let cookie = hub.login().await;

    let page = hub
        .http
        .get(hub.url("/compras?proveedor=Frutas+Lupita"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Limones"));
    assert!(!page.contains("Menta"));

    let none = hub
        .http
        .get(hub.url("/compras/lista.txt?proveedor=Frutas+Lupita"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(none.status(), 303);
    assert!(location(&none).contains("error=seleccion"));

    let resp = hub
        .http
        .get(hub.url("/compras/lista.txt?proveedor=Frutas+Lupita&item=rec1"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .contains("lista_compras_Frutas_Lupita_")
    );
    let text = resp.text().await.unwrap();
    assert!(text.starts_with("📦 Lista de Compras - Frutas Lupita\n"));
    assert!(text.contains("• Limones — 30 kg (actual: 4)\n"));
    assert!(!text.contains("Limas"));
    assert!(text.ends_with("Total: 1 items\n"));
}

#[tokio::test]
async fn completing_a_task_stamps_the_completion_date() {
    let hub = start().await;
    hub.fake.seed(
        "Tareas",
        vec![json!({"id": "recT1", "fields": {"Tarea": "Pedir hielo", "Activa": true, "Estado": "En progreso"}})],
    );
    let cookie = hub.login().await;

    let resp = hub
        .http
        .post(hub.url("/tareas/guardar"))
        .header("cookie", &cookie)
        .form(&[
            ("id", "recT1"),
            ("tarea", "Pedir hielo"),
            ("estado", "Completada"),
            ("prioridad", "Alta"),
            ("f_estado", "Completada"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/tareas?estado=Completada");

    let patched = hub.fake.patched.lock().unwrap();
    let fields = &patched[0].2;
    assert_eq!(fields["Estado"], "Completada");
    assert_eq!(fields["Prioridad"], "Alta");
    let stamped = fields["Fecha de finalización"].as_str().unwrap();
    assert_eq!(stamped.len(), 10);
    assert!(fields.get("Responsable").is_none());
}

#[tokio::test]
async fn new_task_needs_a_title() {
    let hub = start().await;
    let cookie = hub.login().await;

    let resp = hub
        .http
        .post(hub.url("/tareas/guardar"))
        .header("cookie", &cookie)
        .form(&[("tarea", "  ")])
        .send()
        .await
        .unwrap();
    assert!(location(&resp).contains("error=requerido"));

    let resp = hub
        .http
        .post(hub.url("/tareas/guardar"))
        .header("cookie", &cookie)
        .form(&[
            ("tarea", "Limpiar barra"),
            ("responsable", "recU1"),
            ("responsable", "recU2"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/tareas");
    let created = hub.fake.created.lock().unwrap();
    let fields = &created[0].1;
    assert_eq!(fields["Activa"], true);
    assert_eq!(fields["Estado"], "Sin empezar");
    assert_eq!(fields["Responsable"], json!(["recU1", "recU2"]));
    assert_eq!(fields["Fecha de finalización"], serde_json::Value::Null);
}

#[tokio::test]
async fn task_board_hides_inactive_and_names_assignees() {
    let hub = start().await;
    hub.fake.seed(
        "Tareas",
        vec![
            json!({"id": "recT1", "fields": {"Tarea": "Pedir hielo", "Activa": true, "Responsable": ["recU1"]}}),
            json!({"id": "recT2", "fields": {"Tarea": "Archivada", "Activa": false}}),
        ],
    );
    hub.fake.seed(
        "Usuarios",
        vec![json!({"id": "recU1", "fields": {"Nombre": "Ana"}})],
    );
    let cookie = hub.login().await;
    let html = hub
        .http
        .get(hub.url("/tareas"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Pedir hielo"));
    assert!(html.contains("Ana"));
    assert!(!html.contains("Archivada"));
}
