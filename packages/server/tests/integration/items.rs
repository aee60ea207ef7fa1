use serde_json::json;

use crate::common::{TestApp, routes};

mod item_creation {
    use super::*;

    #[tokio::test]
    async fn create_fills_defaults() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::ITEMS, &json!({"name": "Widget", "SKU": "SKU-1"}))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["message"], "Item created successfully");
        let item = res.data();
        assert!(item["id"].as_str().is_some());
        assert_eq!(item["SKU"], "SKU-1");
        assert_eq!(item["quantity"], 0);
        assert_eq!(item["unit"], "pcs");
        assert_eq!(item["lowStockThreshold"], 0);
        assert_eq!(item["cost"], 0.0);
        assert_eq!(item["description"], "");
        assert_eq!(item["imageUrl"], "");
        assert_eq!(item["attributes"], json!([]));
        assert_eq!(item["variants"], json!([]));
        assert!(item["createdAt"].as_str().is_some());
        assert_eq!(item["createdAt"], item["updatedAt"]);
    }

    #[tokio::test]
    async fn create_trims_and_keeps_supplied_fields() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::ITEMS,
                &json!({
                    "name": "  Widget  ",
                    "SKU": " SKU-1 ",
                    "unit": "box",
                    "quantity": 4,
                    "cost": 2.5,
                    "barcode": "4006381333931",
                    "lowStockThreshold": 2,
                    "attributes": [{"key": "color", "value": "blue"}],
                    "variants": [{"name": "Large", "SKU": "SKU-1-L", "quantity": 1}],
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let item = res.data();
        assert_eq!(item["name"], "Widget");
        assert_eq!(item["SKU"], "SKU-1");
        assert_eq!(item["unit"], "box");
        assert_eq!(item["quantity"], 4);
        assert_eq!(item["cost"], 2.5);
        assert_eq!(item["attributes"][0]["value"], "blue");
        assert_eq!(item["variants"][0]["SKU"], "SKU-1-L");
    }

    #[tokio::test]
    async fn missing_name_or_sku_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post_json(routes::ITEMS, &json!({"SKU": "SKU-1"})).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["message"], "name is required");

        let res = app
            .post_json(routes::ITEMS, &json!({"name": "Widget", "SKU": "   "}))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "SKU is required");
    }

    #[tokio::test]
    async fn invalid_numbers_are_rejected() {
        let app = TestApp::spawn().await;

        for body in [
            json!({"name": "W", "SKU": "S", "quantity": -1}),
            json!({"name": "W", "SKU": "S", "quantity": "many"}),
            json!({"name": "W", "SKU": "S", "cost": "free"}),
            json!({"name": "W", "SKU": "S", "lowStockThreshold": 2.5}),
        ] {
            let res = app.post_json(routes::ITEMS, &body).await;
            assert_eq!(res.status, 400, "accepted {body}");
            assert_eq!(res.code(), "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_raw(routes::ITEMS, "application/json", "{\"name\": ")
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");

        let res = app
            .post_raw(routes::ITEMS, "application/json", "[1, 2]")
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Request body must be a JSON object");
    }

    #[tokio::test]
    async fn duplicate_sku_is_a_conflict() {
        let app = TestApp::spawn().await;
        app.create_item(&json!({"name": "Widget", "SKU": "SKU-1"}))
            .await;

        let res = app
            .post_json(routes::ITEMS, &json!({"name": "Gadget", "SKU": "SKU-1"}))
            .await;
        assert_eq!(res.status, 409);
        assert_eq!(res.code(), "CONFLICT");

        let list = app.get(routes::ITEMS).await;
        assert_eq!(list.body["count"], 1);
    }
}

mod item_retrieval {
    use super::*;

    #[tokio::test]
    async fn list_returns_items_oldest_first_with_count() {
        let app = TestApp::spawn().await;
        let first = app.create_item(&json!({"name": "A", "SKU": "A"})).await;
        let second = app.create_item(&json!({"name": "B", "SKU": "B"})).await;

        let res = app.get(routes::ITEMS).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["count"], 2);
        assert_eq!(res.data()[0]["id"], first.as_str());
        assert_eq!(res.data()[1]["id"], second.as_str());
    }

    #[tokio::test]
    async fn empty_list_has_zero_count() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::ITEMS).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["count"], 0);
        assert_eq!(res.data(), &json!([]));
    }

    #[tokio::test]
    async fn get_returns_single_item() {
        let app = TestApp::spawn().await;
        let id = app.create_item(&json!({"name": "A", "SKU": "A"})).await;

        let res = app.get(&routes::item(&id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.data()["name"], "A");
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let app = TestApp::spawn().await;

        for id in ["0190f2a4-7c1e-7000-8000-000000000000", "not-an-id"] {
            let res = app.get(&routes::item(id)).await;
            assert_eq!(res.status, 404, "GET {id}");
            assert_eq!(res.code(), "NOT_FOUND");

            let res = app
                .put_json(&routes::item(id), &json!({"name": "X"}))
                .await;
            assert_eq!(res.status, 404, "PUT {id}");

            let res = app
                .patch_json(&routes::item_quantity(id), &json!({"quantity": 1}))
                .await;
            assert_eq!(res.status, 404, "PATCH {id}");

            let res = app.delete(&routes::item(id)).await;
            assert_eq!(res.status, 404, "DELETE {id}");
        }
    }
}

mod item_update {
    use super::*;

    #[tokio::test]
    async fn partial_update_keeps_absent_fields() {
        let app = TestApp::spawn().await;
        let id = app
            .create_item(&json!({
                "name": "Widget",
                "SKU": "SKU-1",
                "description": "Blue widget",
                "quantity": 5,
                "attributes": [{"key": "color", "value": "blue"}],
            }))
            .await;

        let res = app
            .put_json(
                &routes::item(&id),
                &json!({"cost": 9.5, "description": "", "barcode": null}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Item updated successfully");
        let item = res.data();
        assert_eq!(item["cost"], 9.5);
        assert_eq!(item["name"], "Widget");
        assert_eq!(item["description"], "Blue widget");
        assert_eq!(item["quantity"], 5);
        assert_eq!(item["attributes"][0]["key"], "color");
    }

    #[tokio::test]
    async fn update_ignores_read_only_fields() {
        let app = TestApp::spawn().await;
        let id = app.create_item(&json!({"name": "A", "SKU": "A"})).await;
        let before = app.get(&routes::item(&id)).await;

        let res = app
            .put_json(
                &routes::item(&id),
                &json!({"id": "other", "createdAt": "2000-01-01T00:00:00Z", "name": "B"}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.data()["id"], id.as_str());
        assert_eq!(res.data()["createdAt"], before.data()["createdAt"]);
        assert_eq!(res.data()["name"], "B");
    }

    #[tokio::test]
    async fn update_to_taken_sku_conflicts() {
        let app = TestApp::spawn().await;
        app.create_item(&json!({"name": "A", "SKU": "A"})).await;
        let b = app.create_item(&json!({"name": "B", "SKU": "B"})).await;

        let res = app.put_json(&routes::item(&b), &json!({"SKU": "A"})).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.code(), "CONFLICT");

        let res = app.get(&routes::item(&b)).await;
        assert_eq!(res.data()["SKU"], "B");
    }

    #[tokio::test]
    async fn attributes_can_be_replaced_as_encoded_text() {
        let app = TestApp::spawn().await;
        let id = app.create_item(&json!({"name": "A", "SKU": "A"})).await;

        let res = app
            .put_json(
                &routes::item(&id),
                &json!({"attributes": "[{\"key\":\"size\",\"value\":\"L\"}]"}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["attributes"], json!([{"key": "size", "value": "L"}]));

        let res = app
            .put_json(&routes::item(&id), &json!({"attributes": "[oops"}))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}

mod quantity_update {
    use super::*;

    #[tokio::test]
    async fn sets_quantity_only() {
        let app = TestApp::spawn().await;
        let id = app
            .create_item(&json!({"name": "A", "SKU": "A", "cost": 3.0}))
            .await;

        let res = app
            .patch_json(&routes::item_quantity(&id), &json!({"quantity": 7}))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["quantity"], 7);
        assert_eq!(res.data()["cost"], 3.0);
    }

    #[tokio::test]
    async fn is_idempotent() {
        let app = TestApp::spawn().await;
        let id = app.create_item(&json!({"name": "A", "SKU": "A"})).await;

        for _ in 0..2 {
            let res = app
                .patch_json(&routes::item_quantity(&id), &json!({"quantity": "4"}))
                .await;
            assert_eq!(res.status, 200);
            assert_eq!(res.data()["quantity"], 4);
        }

        let res = app.get(&routes::item(&id)).await;
        assert_eq!(res.data()["quantity"], 4);
    }

    #[tokio::test]
    async fn rejects_invalid_quantities() {
        let app = TestApp::spawn().await;
        let id = app.create_item(&json!({"name": "A", "SKU": "A"})).await;

        for body in [
            json!({}),
            json!({"quantity": null}),
            json!({"quantity": "abc"}),
            json!({"quantity": -3}),
            json!({"quantity": 1.5}),
        ] {
            let res = app.patch_json(&routes::item_quantity(&id), &body).await;
            assert_eq!(res.status, 400, "accepted {body}");
            assert_eq!(res.code(), "VALIDATION_ERROR");
        }
    }
}

mod low_stock {
    use super::*;

    #[tokio::test]
    async fn equal_to_threshold_counts_as_low() {
        let app = TestApp::spawn().await;
        let below = app
            .create_item(&json!({"name": "A", "SKU": "A", "quantity": 1, "lowStockThreshold": 5}))
            .await;
        let equal = app
            .create_item(&json!({"name": "B", "SKU": "B", "quantity": 5, "lowStockThreshold": 5}))
            .await;
        app.create_item(&json!({"name": "C", "SKU": "C", "quantity": 6, "lowStockThreshold": 5}))
            .await;
        let zero = app.create_item(&json!({"name": "D", "SKU": "D"})).await;

        let res = app.get(routes::LOW_STOCK).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["count"], 3);

        let ids: Vec<&str> = res
            .data()
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec![below.as_str(), equal.as_str(), zero.as_str()]);
    }
}

mod item_deletion {
    use super::*;

    #[tokio::test]
    async fn delete_returns_record_then_not_found() {
        let app = TestApp::spawn().await;
        let id = app.create_item(&json!({"name": "A", "SKU": "A"})).await;

        let res = app.delete(&routes::item(&id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Item deleted successfully");
        assert_eq!(res.data()["id"], id.as_str());

        let res = app.get(&routes::item(&id)).await;
        assert_eq!(res.status, 404);

        // The SKU is free again.
        let res = app
            .post_json(routes::ITEMS, &json!({"name": "A2", "SKU": "A"}))
            .await;
        assert_eq!(res.status, 201);
    }
}

mod scenario {
    use super::*;

    #[tokio::test]
    async fn widget_lifecycle() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::ITEMS, &json!({"name": "Widget", "SKU": "SKU-1"}))
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.data()["quantity"], 0);
        assert_eq!(res.data()["unit"], "pcs");
        let first = res.id();

        let res = app
            .patch_json(&routes::item_quantity(&first), &json!({"quantity": 3}))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.data()["quantity"], 3);

        let second = app
            .create_item(&json!({
                "name": "Gadget",
                "SKU": "SKU-2",
                "lowStockThreshold": 5,
                "quantity": 2,
            }))
            .await;

        let res = app.get(routes::LOW_STOCK).await;
        let ids: Vec<&str> = res
            .data()
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec![second.as_str()]);

        let res = app.delete(&routes::item(&second)).await;
        assert_eq!(res.status, 200);

        let res = app.get(&routes::item(&second)).await;
        assert_eq!(res.status, 404);
    }
}

mod misc_routes {
    use super::*;

    #[tokio::test]
    async fn sku_suggestion_uses_prefix() {
        let app = TestApp::spawn().await;

        let res = app.get(&format!("{}?prefix=shoe%20box", routes::SKU)).await;
        assert_eq!(res.status, 200);
        let sku = res.data()["sku"].as_str().unwrap();
        assert!(sku.starts_with("SHOEBOX-"), "{sku}");

        let res = app.get(routes::SKU).await;
        assert!(res.data()["sku"].as_str().unwrap().starts_with("ITEM-"));
    }

    #[tokio::test]
    async fn unknown_route_returns_envelope() {
        let app = TestApp::spawn().await;

        let res = app.get("/api/nothing-here").await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn openapi_document_lists_item_routes() {
        let app = TestApp::spawn().await;

        let res = app.get("/api-docs/openapi.json").await;
        assert_eq!(res.status, 200);
        let paths = &res.body["paths"];
        assert!(paths.get("/api/items").is_some());
        assert!(paths.get("/api/items/{id}").is_some());
        assert!(paths.get("/api/items/{id}/quantity").is_some());
        assert!(paths.get("/api/items/low-stock").is_some());
    }
}
