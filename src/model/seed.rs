//! First-run dataset.

use chrono::{SubsecRound, Utc};

use super::*;

/// Build the aggregate written on first access to an empty store.
///
/// The single seed order is stamped with the current time.
pub fn default_aggregate() -> Aggregate {
    Aggregate {
        workshops: vec![
            workshop("w1", "Taller Central", "Buenos Aires", "Juan Perez"),
            workshop("w2", "Confección Sur", "Avellaneda", "Maria Lopez"),
        ],
        articles: vec![
            article("a1", "Remera Oversize Basic", "REM-OV-001", "Remeras"),
            article("a2", "Hoodie Heavyweight", "HOO-HW-002", "Abrigo"),
            article("a3", "Pantalón Cargo", "PAN-CA-003", "Pantalones"),
        ],
        tasks: vec![
            task("t1", "Corte", 150.0),
            task("t2", "Confección", 500.0),
            task("t3", "Estampado", 200.0),
            task("t4", "Terminación", 100.0),
        ],
        processes: vec![
            process("p1", "Producción Standard", "Flujo normal"),
            process("p2", "Producción Express", "Prioridad alta"),
        ],
        production: vec![ProductionOrder {
            id: RecordId::from("o1"),
            date: Utc::now().trunc_subsecs(3),
            workshop_id: RecordId::from("w1"),
            article_id: RecordId::from("a1"),
            process_id: RecordId::from("p1"),
            task_id: RecordId::from("t2"),
            quantity: 50,
            status: OrderStatus::InProgress,
            notes: Some("Entrega urgente para el viernes".to_string()),
        }],
    }
}

fn workshop(id: &str, name: &str, location: &str, contact: &str) -> Workshop {
    Workshop {
        id: RecordId::from(id),
        name: name.to_string(),
        location: Some(location.to_string()),
        contact: Some(contact.to_string()),
    }
}

fn article(id: &str, name: &str, sku: &str, category: &str) -> Article {
    Article {
        id: RecordId::from(id),
        name: name.to_string(),
        sku: sku.to_string(),
        category: category.to_string(),
    }
}

fn task(id: &str, name: &str, cost_per_unit: f64) -> Task {
    Task {
        id: RecordId::from(id),
        name: name.to_string(),
        cost_per_unit,
    }
}

fn process(id: &str, name: &str, description: &str) -> Process {
    Process {
        id: RecordId::from(id),
        name: name.to_string(),
        description: Some(description.to_string()),
    }
}
