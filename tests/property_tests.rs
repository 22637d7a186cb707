/// Property-based tests using proptest
/// Tests invariants of the lead schema, the listing limit and the
/// document mapping that should hold for all inputs
use dot2connect_api::db::DocumentStore;
use dot2connect_api::db_storage::LeadStorage;
use dot2connect_api::memory_store::MemoryStore;
use dot2connect_api::models::{Lead, LeadResponse, LEAD_COLLECTION};
use dot2connect_api::validation::{validate_lead, validate_limit};
use mongodb::bson::{doc, oid::ObjectId};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn optional_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of("\\PC{0,40}")
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// Property: Valid submissions are accepted and keep every supplied field
proptest! {
    #[test]
    fn valid_leads_always_accepted(
        name in "[A-Za-z][A-Za-z ]{0,30}",
        email in "[a-z]{1,10}@[a-z]{1,10}\\.[a-z]{2,4}",
        company in optional_text(),
        phone in optional_text(),
        message in optional_text(),
        service_interest in optional_text(),
    ) {
        let mut payload = Map::new();
        payload.insert("name".into(), json!(name));
        payload.insert("email".into(), json!(email));
        for (key, value) in [
            ("company", &company),
            ("phone", &phone),
            ("message", &message),
            ("service_interest", &service_interest),
        ] {
            if let Some(v) = value {
                payload.insert(key.into(), json!(v));
            }
        }

        let lead = validate_lead(&Value::Object(payload)).unwrap();
        prop_assert_eq!(lead.name, name);
        prop_assert_eq!(lead.email, email);
        prop_assert_eq!(lead.company, company);
        prop_assert_eq!(lead.phone, phone);
        prop_assert_eq!(lead.message, message);
        prop_assert_eq!(lead.service_interest, service_interest);
    }

    #[test]
    fn missing_name_or_email_always_rejected(
        value in "\\PC{1,20}",
        drop_name in proptest::bool::ANY,
    ) {
        let payload = if drop_name {
            json!({"email": value})
        } else {
            json!({"name": value})
        };
        let err = validate_lead(&payload).unwrap_err();
        let expected = if drop_name { "name" } else { "email" };
        prop_assert!(err.field_names().contains(&expected));
    }

    #[test]
    fn validation_never_panics(raw in "\\PC*") {
        let payload = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw));
        let _ = validate_lead(&payload);
    }
}

// Property: Limit is accepted exactly on [1, 100]
proptest! {
    #[test]
    fn limit_accepted_only_in_range(limit in -1_000i64..1_000) {
        let result = validate_limit(Some(limit));
        prop_assert_eq!(result.is_ok(), (1..=100).contains(&limit));
    }
}

// Property: Mapping never fails and always yields the full outbound shape
proptest! {
    #[test]
    fn mapping_fills_every_field(
        has_id in proptest::bool::ANY,
        name in prop::option::of("\\PC{0,20}"),
        company in optional_text(),
    ) {
        let mut document = doc! {};
        if has_id {
            document.insert("_id", ObjectId::new());
        }
        if let Some(ref n) = name {
            document.insert("name", n.as_str());
        }
        if let Some(ref c) = company {
            document.insert("company", c.as_str());
        }

        let lead = LeadResponse::from_document(&document);
        prop_assert_eq!(lead.id.is_empty(), !has_id);
        prop_assert_eq!(&lead.name, &name.unwrap_or_default());
        prop_assert_eq!(lead.email.as_str(), "");
        prop_assert_eq!(&lead.company, &company);

        let json = serde_json::to_value(&lead).unwrap();
        prop_assert_eq!(json.as_object().unwrap().len(), 7);
    }
}

// Property: Stored leads round-trip and listing respects the limit
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn insert_then_query_round_trips(
        name in "[A-Za-z]{1,20}",
        email in "[a-z]{1,10}@[a-z]{1,10}\\.com",
        company in optional_text(),
    ) {
        let lead = Lead {
            name,
            email,
            company,
            phone: None,
            message: None,
            service_interest: None,
        };

        let (id, listed) = runtime().block_on(async {
            let storage = LeadStorage::new(Arc::new(MemoryStore::new()));
            let id = storage.create_lead(&lead).await.unwrap();
            (id, storage.list_leads(100).await.unwrap())
        });

        prop_assert_eq!(listed.len(), 1);
        let stored = &listed[0];
        prop_assert_eq!(&stored.id, &id);
        prop_assert_eq!(&stored.name, &lead.name);
        prop_assert_eq!(&stored.email, &lead.email);
        prop_assert_eq!(&stored.company, &lead.company);
    }

    #[test]
    fn query_never_exceeds_limit(stored in 0usize..40, limit in 1i64..=100) {
        let returned = runtime().block_on(async {
            let store = MemoryStore::new();
            for i in 0..stored {
                store
                    .insert(LEAD_COLLECTION, doc! { "name": format!("Lead {}", i) })
                    .await
                    .unwrap();
            }
            store.query(LEAD_COLLECTION, doc! {}, limit).await.unwrap().len()
        });

        prop_assert!(returned as i64 <= limit);
        prop_assert_eq!(returned, stored.min(limit as usize));
    }
}
