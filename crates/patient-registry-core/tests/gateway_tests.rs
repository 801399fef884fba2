//! Storage gateway integration tests.

use std::sync::Arc;
use std::thread;

use patient_registry_core::{
    GatewayConfig, GatewayError, NewPatient, PatientRegistry, Readiness, StorageGateway,
};
use serde_json::json;

fn register(gateway: &StorageGateway, first: &str, last: &str) -> anyhow::Result<i64> {
    Ok(gateway.register_patient(&NewPatient::new(first, last, "2000-01-01", "other"))?)
}

#[test]
fn test_concurrent_acquire_shares_one_handle() -> anyhow::Result<()> {
    let gateway = StorageGateway::default();

    let handles = thread::scope(|scope| {
        let workers: Vec<_> = (0..8).map(|_| scope.spawn(|| gateway.acquire())).collect();
        workers
            .into_iter()
            .map(|w| w.join().expect("acquire thread panicked"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    for handle in &handles[1..] {
        assert!(Arc::ptr_eq(&handles[0], handle));
    }
    assert_eq!(gateway.initializations(), 1);
    Ok(())
}

#[test]
fn test_failed_initialization_is_retried() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let data_dir = dir.path().join("data");
    let gateway = StorageGateway::new(GatewayConfig::file(data_dir.join("registry.db")));

    assert!(matches!(
        gateway.acquire(),
        Err(GatewayError::Initialization(_))
    ));
    assert_eq!(gateway.initializations(), 0);

    std::fs::create_dir(&data_dir)?;
    gateway.acquire()?;
    assert_eq!(gateway.initializations(), 1);
    Ok(())
}

#[test]
fn test_register_required_fields_only() -> anyhow::Result<()> {
    let gateway = StorageGateway::default();
    let id = gateway.register_patient(&NewPatient::new("Ana", "Rao", "1990-05-01", "female"))?;
    assert_eq!(id, 1);

    let patients = gateway.list_patients()?;
    assert_eq!(patients.len(), 1);

    let ana = &patients[0];
    assert_eq!(ana.id, 1);
    assert_eq!(ana.first_name, "Ana");
    assert_eq!(ana.last_name, "Rao");
    assert_eq!(ana.date_of_birth, "1990-05-01");
    assert_eq!(ana.gender, "female");
    assert_eq!(ana.email, None);
    assert_eq!(ana.phone, None);
    assert_eq!(ana.address, None);
    assert!(ana.created_at.as_deref().is_some_and(|d| d.len() == 10));
    Ok(())
}

#[test]
fn test_date_of_birth_keeps_calendar_date() -> anyhow::Result<()> {
    let gateway = StorageGateway::default();
    let id = gateway.register_patient(&NewPatient::new("Kenji", "Sato", "2024-01-01", "male"))?;
    let patient = gateway.get_patient(id)?.expect("patient exists");
    assert_eq!(patient.date_of_birth, "2024-01-01");
    Ok(())
}

#[test]
fn test_list_empty_and_ordered() -> anyhow::Result<()> {
    let gateway = StorageGateway::default();
    assert!(gateway.list_patients()?.is_empty());

    register(&gateway, "bob", "Smith")?;
    register(&gateway, "Alice", "Smith")?;
    register(&gateway, "Zed", "Adams")?;
    register(&gateway, "Amy", "adams")?;

    let names: Vec<(String, String)> = gateway
        .list_patients()?
        .into_iter()
        .map(|p| (p.last_name, p.first_name))
        .collect();

    // Binary collation: uppercase sorts before lowercase
    assert_eq!(
        names,
        vec![
            ("Adams".to_string(), "Zed".to_string()),
            ("Smith".to_string(), "Alice".to_string()),
            ("Smith".to_string(), "bob".to_string()),
            ("adams".to_string(), "Amy".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_search_is_case_insensitive_substring() -> anyhow::Result<()> {
    let gateway = StorageGateway::default();
    register(&gateway, "John", "Smith")?;
    register(&gateway, "Mary", "Smalley")?;
    register(&gateway, "Tom", "Jones")?;

    let matched: Vec<String> = gateway
        .search_patients_by_name("sm")?
        .into_iter()
        .map(|p| p.last_name)
        .collect();
    assert_eq!(matched, vec!["Smalley", "Smith"]);

    assert_eq!(gateway.search_patients_by_name("")?.len(), 3);
    assert!(gateway.search_patients_by_name("xyz")?.is_empty());
    Ok(())
}

#[test]
fn test_search_folds_accented_names() -> anyhow::Result<()> {
    let gateway = StorageGateway::default();
    register(&gateway, "Émile", "Ödegaard")?;
    register(&gateway, "Ana", "Rao")?;

    for term in ["é", "ÉMILE", "ödeg", "Öde"] {
        let found = gateway.search_patients_by_name(term)?;
        assert_eq!(found.len(), 1, "{term:?}");
        assert_eq!(found[0].last_name, "Ödegaard");
    }
    Ok(())
}

#[test]
fn test_execute_query_envelopes() -> anyhow::Result<()> {
    let gateway = StorageGateway::default();

    let result = gateway.execute_query("SELECT * FROM patients", &[]);
    assert_eq!(
        serde_json::to_value(&result)?,
        json!({"success": true, "data": [], "error": null})
    );

    let result = gateway.execute_query("SELEC * FROM x", &[]);
    assert!(!result.success);
    assert!(result.data.is_empty());
    assert!(result.error.is_some());
    Ok(())
}

#[test]
fn test_execute_query_rejects_statement_batches() -> anyhow::Result<()> {
    let gateway = StorageGateway::default();
    register(&gateway, "Ana", "Rao")?;

    let result = gateway.execute_query(
        "DELETE FROM patients WHERE id = ?1; DELETE FROM patients",
        &[json!(1)],
    );
    assert!(!result.success);
    assert!(result.data.is_empty());
    assert_eq!(
        result.error.as_deref(),
        Some("Only one statement can run per query")
    );
    assert_eq!(gateway.count_patients()?, 1);
    Ok(())
}

#[test]
fn test_execute_query_without_statement_succeeds_empty() -> anyhow::Result<()> {
    let gateway = StorageGateway::default();
    for sql in ["", "  \n\t", "-- nothing to run", "/* still nothing */"] {
        let result = gateway.execute_query(sql, &[]);
        assert_eq!(
            serde_json::to_value(&result)?,
            json!({"success": true, "data": [], "error": null}),
            "{sql:?}"
        );
    }
    Ok(())
}

#[test]
fn test_end_to_end_registration() -> anyhow::Result<()> {
    let registry = PatientRegistry::new(GatewayConfig::in_memory());
    assert_eq!(registry.start(), Readiness::Ready);

    let gateway = registry.gateway();
    let id = gateway.register_patient(&NewPatient::new("Ana", "Rao", "1990-05-01", "female"))?;
    assert_eq!(id, 1);

    let listed = serde_json::to_value(gateway.list_patients()?)?;
    let row = &listed[0];
    assert_eq!(row["id"], json!(1));
    assert_eq!(row["first_name"], json!("Ana"));
    assert_eq!(row["last_name"], json!("Rao"));
    assert_eq!(row["date_of_birth"], json!("1990-05-01"));
    assert_eq!(row["gender"], json!("female"));
    assert_eq!(row["email"], json!(null));
    assert_eq!(row["phone"], json!(null));
    assert_eq!(row["address"], json!(null));

    // The console sees the same store
    let result = gateway.execute_query(
        "SELECT first_name FROM patients WHERE last_name = ?1",
        &[json!("Rao")],
    );
    assert!(result.success);
    assert_eq!(result.data[0]["first_name"], json!("Ana"));
    Ok(())
}

#[test]
fn test_file_store_persists_across_gateways() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = GatewayConfig::file(dir.path().join("registry.db"));

    {
        let gateway = StorageGateway::new(config.clone());
        register(&gateway, "Ana", "Rao")?;
    }

    let gateway = StorageGateway::new(config);
    assert_eq!(gateway.count_patients()?, 1);
    Ok(())
}
