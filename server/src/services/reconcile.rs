//! Ticket type reconciliation for event updates.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::requests::UpdateTicketTypeRequest;
use crate::models::{TicketType, TicketTypeChanges};
use crate::utils::error::AppError;

/// Bring `ticket_types` (the persisted set owned by `event_id`) in line with
/// the requested list and report what changed.
///
/// Persisted ticket types whose id is absent from the request are dropped
/// first; only then are the request entries matched, in order. An entry
/// without an id creates a ticket type, an entry with a known id updates it,
/// and an entry with an unknown id aborts with `TicketTypeNotFound`. On error
/// `ticket_types` may be partially modified and must be discarded.
pub fn reconcile_ticket_types(
    event_id: Uuid,
    ticket_types: &mut Vec<TicketType>,
    requested: &[UpdateTicketTypeRequest],
    now: DateTime<Utc>,
) -> Result<TicketTypeChanges, AppError> {
    let kept_ids: HashSet<Uuid> = requested.iter().filter_map(|r| r.id).collect();

    let mut changes = TicketTypeChanges::default();
    ticket_types.retain(|tt| {
        let keep = kept_ids.contains(&tt.id);
        if !keep {
            changes.removed.push(tt.id);
        }
        keep
    });

    let index: HashMap<Uuid, usize> = ticket_types
        .iter()
        .enumerate()
        .map(|(position, tt)| (tt.id, position))
        .collect();

    let mut updated_positions: Vec<usize> = Vec::new();
    let mut created_positions: Vec<usize> = Vec::new();

    for request in requested {
        match request.id {
            None => {
                ticket_types.push(TicketType {
                    id: Uuid::new_v4(),
                    event_id,
                    name: request.name.clone(),
                    price: request.price,
                    description: request.description.clone(),
                    total_available: request.total_available,
                    created_at: now,
                    updated_at: now,
                });
                created_positions.push(ticket_types.len() - 1);
            }
            Some(id) => {
                let Some(&position) = index.get(&id) else {
                    return Err(AppError::TicketTypeNotFound(format!(
                        "Ticket type with id {} not found",
                        id
                    )));
                };

                let existing = &mut ticket_types[position];
                existing.name = request.name.clone();
                existing.price = request.price;
                existing.description = request.description.clone();
                existing.total_available = request.total_available;
                existing.updated_at = now;

                if !updated_positions.contains(&position) {
                    updated_positions.push(position);
                }
            }
        }
    }

    changes.updated = updated_positions
        .into_iter()
        .map(|position| ticket_types[position].clone())
        .collect();
    changes.created = created_positions
        .into_iter()
        .map(|position| ticket_types[position].clone())
        .collect();

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn persisted(event_id: Uuid, name: &str) -> TicketType {
        let created = Utc::now();
        TicketType {
            id: Uuid::new_v4(),
            event_id,
            name: name.to_string(),
            price: Decimal::new(1000, 2),
            description: None,
            total_available: Some(100),
            created_at: created,
            updated_at: created,
        }
    }

    fn request(id: Option<Uuid>, name: &str, cents: i64) -> UpdateTicketTypeRequest {
        UpdateTicketTypeRequest {
            id,
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            description: Some(format!("{} description", name)),
            total_available: Some(50),
        }
    }

    #[test]
    fn test_omitted_ticket_types_are_removed_and_new_ones_created() {
        let event_id = Uuid::new_v4();
        let a = persisted(event_id, "A");
        let b = persisted(event_id, "B");
        let c = persisted(event_id, "C");
        let mut ticket_types = vec![a.clone(), b.clone(), c.clone()];

        let changes = reconcile_ticket_types(
            event_id,
            &mut ticket_types,
            &[request(Some(b.id), "B2", 2500), request(None, "VIP", 9900)],
            Utc::now(),
        )
        .unwrap();

        assert_eq!(ticket_types.len(), 2);
        assert_eq!(ticket_types[0].id, b.id);
        assert_eq!(ticket_types[0].name, "B2");
        assert_eq!(ticket_types[0].price, Decimal::new(2500, 2));
        assert_eq!(ticket_types[0].total_available, Some(50));
        assert_eq!(ticket_types[1].name, "VIP");
        assert_eq!(ticket_types[1].event_id, event_id);

        assert_eq!(changes.removed, vec![a.id, c.id]);
        assert_eq!(changes.updated.len(), 1);
        assert_eq!(changes.updated[0].id, b.id);
        assert_eq!(changes.created.len(), 1);
        assert_eq!(changes.created[0].name, "VIP");
    }

    #[test]
    fn test_unknown_id_fails_with_ticket_type_not_found() {
        let event_id = Uuid::new_v4();
        let mut ticket_types = vec![persisted(event_id, "A")];
        let unknown = Uuid::new_v4();

        let result = reconcile_ticket_types(
            event_id,
            &mut ticket_types,
            &[request(Some(unknown), "Ghost", 100)],
            Utc::now(),
        );

        assert!(matches!(result, Err(AppError::TicketTypeNotFound(msg)) if msg.contains(&unknown.to_string())));
    }

    #[test]
    fn test_empty_request_removes_everything() {
        let event_id = Uuid::new_v4();
        let a = persisted(event_id, "A");
        let mut ticket_types = vec![a.clone()];

        let changes = reconcile_ticket_types(event_id, &mut ticket_types, &[], Utc::now()).unwrap();

        assert!(ticket_types.is_empty());
        assert_eq!(changes.removed, vec![a.id]);
        assert!(changes.updated.is_empty());
        assert!(changes.created.is_empty());
    }

    #[test]
    fn test_unchanged_request_reports_updates_only() {
        let event_id = Uuid::new_v4();
        let a = persisted(event_id, "A");
        let mut ticket_types = vec![a.clone()];

        let changes = reconcile_ticket_types(
            event_id,
            &mut ticket_types,
            &[request(Some(a.id), "A", 1000)],
            Utc::now(),
        )
        .unwrap();

        assert!(changes.removed.is_empty());
        assert!(changes.created.is_empty());
        assert_eq!(changes.updated.len(), 1);
    }

    #[test]
    fn test_repeated_id_is_updated_once_with_last_values() {
        let event_id = Uuid::new_v4();
        let a = persisted(event_id, "A");
        let mut ticket_types = vec![a.clone()];

        let changes = reconcile_ticket_types(
            event_id,
            &mut ticket_types,
            &[request(Some(a.id), "first", 100), request(Some(a.id), "second", 200)],
            Utc::now(),
        )
        .unwrap();

        assert_eq!(changes.updated.len(), 1);
        assert_eq!(changes.updated[0].name, "second");
        assert_eq!(ticket_types.len(), 1);
    }
}
