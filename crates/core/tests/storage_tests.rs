// ═══════════════════════════════════════════════════════════════════
// Storage Tests — JSON layout, file load/save, legacy compatibility
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use crypto_portfolio_core::errors::CoreError;
use crypto_portfolio_core::models::lot::Lot;
use crypto_portfolio_core::models::portfolio::Portfolio;
use crypto_portfolio_core::storage::manager::StorageManager;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample() -> Portfolio {
    Portfolio {
        lots: vec![
            Lot::new(date(2025, 1, 10), "BTC", 42000.0, 0.25, 45000.0),
            Lot::new(date(2025, 1, 12), "ETH", 2500.0, 3.0, 2400.0),
        ],
    }
}

// ═══════════════════════════════════════════════════════════════════
// In-memory
// ═══════════════════════════════════════════════════════════════════

mod strings {
    use super::*;

    #[test]
    fn save_then_load_preserves_lots() {
        let p = sample();
        let json = StorageManager::save_to_string(&p).unwrap();
        let loaded = StorageManager::load_from_str(&json).unwrap();
        assert_eq!(loaded, p);
    }

    #[test]
    fn output_uses_four_space_indent() {
        let json = StorageManager::save_to_string(&sample()).unwrap();
        assert!(json.starts_with("[\n    {"));
        assert!(json.contains("\n        \"Coin\": \"BTC\""));
    }

    #[test]
    fn empty_portfolio_is_empty_array() {
        let json = StorageManager::save_to_string(&Portfolio::new()).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn blank_input_is_empty_portfolio() {
        assert!(StorageManager::load_from_str("  \n").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = StorageManager::load_from_str("{\"not\": \"a list\"}").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn load_recomputes_stale_metrics() {
        let json = r#"[
            {
                "Date": "2024-12-01",
                "Coin": "sol",
                "Entry Price ($)": 100.0,
                "Qty": 10.0,
                "Current Price ($)": 130.0,
                "Current Change (%)": 999.0,
                "Profit ($)": -1.0
            }
        ]"#;
        let p = StorageManager::load_from_str(json).unwrap();
        let lot = &p.lots[0];
        assert_eq!(lot.symbol, "SOL");
        assert!((lot.change_pct - 30.0).abs() < 1e-9);
        assert!((lot.profit - 300.0).abs() < 1e-9);
    }

    #[test]
    fn load_without_derived_fields() {
        let json = r#"[{"Date":"2024-12-01","Coin":"BTC","Entry Price ($)":50000.0,"Qty":0.1,"Current Price ($)":55000.0}]"#;
        let p = StorageManager::load_from_str(json).unwrap();
        assert!((p.lots[0].profit - 500.0).abs() < 1e-9);
    }

    #[test]
    fn legacy_records_get_stable_ids_after_first_save() {
        let json = r#"[{"Date":"2024-12-01","Coin":"BTC","Entry Price ($)":1.0,"Qty":1.0,"Current Price ($)":1.0}]"#;
        let first = StorageManager::load_from_str(json).unwrap();
        let saved = StorageManager::save_to_string(&first).unwrap();
        let second = StorageManager::load_from_str(&saved).unwrap();
        assert_eq!(first.lots[0].id, second.lots[0].id);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Files
// ═══════════════════════════════════════════════════════════════════

mod files {
    use super::*;

    #[test]
    fn missing_file_is_empty_portfolio() {
        let dir = tempfile::tempdir().unwrap();
        let p = StorageManager::load_from_file(dir.path().join("portfolio.json")).unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        let p = sample();
        StorageManager::save_to_file(&p, &path).unwrap();
        assert!(path.exists());
        assert_eq!(StorageManager::load_from_file(&path).unwrap(), p);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("portfolio.json");
        StorageManager::save_to_file(&sample(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        StorageManager::save_to_file(&sample(), &path).unwrap();
        StorageManager::save_to_file(&Portfolio::new(), &path).unwrap();
        assert!(StorageManager::load_from_file(&path).unwrap().is_empty());
    }

    #[test]
    fn corrupted_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        std::fs::write(&path, "[{\"Date\": 12}").unwrap();
        assert!(StorageManager::load_from_file(&path).is_err());
    }

    #[test]
    fn directory_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StorageManager::load_from_file(dir.path()).unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }
}
