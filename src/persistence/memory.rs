//! In-memory [`BookingRepository`] for single-instance mode and tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{BookingRepository, RepositoryError};
use crate::domain::{Booking, BookingId, BookingStatus, ResourceId, TimeRange};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: Vec<Booking>,
}

/// Booking table held in process memory.
///
/// Ids start at 1 and increase by one per insert. Each method takes the
/// table lock once, giving the same single-statement atomicity as the
/// database implementation and nothing more.
#[derive(Debug, Default)]
pub struct InMemoryBookingRepository {
    table: RwLock<Table>,
}

impl InMemoryBookingRepository {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn count_overlapping(
        &self,
        resource_id: ResourceId,
        range: &TimeRange,
    ) -> Result<u64, RepositoryError> {
        let table = self.table.read().await;
        let count = table
            .rows
            .iter()
            .filter(|b| {
                b.resource_id == resource_id && b.status.is_active() && b.range.overlaps(range)
            })
            .count();
        Ok(count as u64)
    }

    async fn insert(
        &self,
        resource_id: ResourceId,
        range: &TimeRange,
    ) -> Result<BookingId, RepositoryError> {
        let mut table = self.table.write().await;
        table.last_id = table.last_id.saturating_add(1);
        let id = BookingId::new(table.last_id);
        table.rows.push(Booking {
            id,
            resource_id,
            range: *range,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Booking>, RepositoryError> {
        let table = self.table.read().await;
        let mut bookings = table.rows.clone();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(bookings)
    }

    async fn get(&self, id: BookingId) -> Result<Option<Booking>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|b| b.id == id).cloned())
    }

    async fn set_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<bool, RepositoryError> {
        let mut table = self.table.write().await;
        match table.rows.iter_mut().find(|b| b.id == id) {
            Some(booking) => {
                booking.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_status_if(
        &self,
        id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<bool, RepositoryError> {
        let mut table = self.table.write().await;
        match table.rows.iter_mut().find(|b| b.id == id) {
            Some(booking) if booking.status == expected => {
                booking.status = next;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> TimeRange {
        let Ok(r) = TimeRange::parse_rfc3339(start, end) else {
            panic!("valid range");
        };
        r
    }

    const R1: ResourceId = ResourceId::new(1);

    #[tokio::test]
    async fn insert_assigns_increasing_ids_and_pending_status() {
        let repo = InMemoryBookingRepository::new();
        let r = range("2026-01-01T10:00:00Z", "2026-01-01T11:00:00Z");

        let Ok(first) = repo.insert(R1, &r).await else {
            panic!("insert failed");
        };
        let Ok(second) = repo.insert(R1, &r).await else {
            panic!("insert failed");
        };
        assert_eq!(first, BookingId::new(1));
        assert_eq!(second, BookingId::new(2));

        let Ok(Some(stored)) = repo.get(first).await else {
            panic!("booking missing");
        };
        assert_eq!(stored.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn count_ignores_other_resources_adjacent_and_cancelled() {
        let repo = InMemoryBookingRepository::new();
        let a = range("2026-01-01T10:00:00Z", "2026-01-01T11:00:00Z");
        let Ok(a_id) = repo.insert(R1, &a).await else {
            panic!("insert failed");
        };
        let _ = repo
            .insert(ResourceId::new(2), &range("2026-01-01T10:00:00Z", "2026-01-01T11:00:00Z"))
            .await;

        let query = range("2026-01-01T10:30:00Z", "2026-01-01T11:30:00Z");
        assert!(matches!(repo.count_overlapping(R1, &query).await, Ok(1)));

        let adjacent = range("2026-01-01T11:00:00Z", "2026-01-01T12:00:00Z");
        assert!(matches!(repo.count_overlapping(R1, &adjacent).await, Ok(0)));

        let _ = repo.set_status(a_id, BookingStatus::Cancelled).await;
        assert!(matches!(repo.count_overlapping(R1, &query).await, Ok(0)));
    }

    #[tokio::test]
    async fn approved_bookings_still_block() {
        let repo = InMemoryBookingRepository::new();
        let a = range("2026-01-01T10:00:00Z", "2026-01-01T11:00:00Z");
        let Ok(id) = repo.insert(R1, &a).await else {
            panic!("insert failed");
        };
        let _ = repo.set_status(id, BookingStatus::Approved).await;
        assert!(matches!(repo.count_overlapping(R1, &a).await, Ok(1)));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = InMemoryBookingRepository::new();
        let r = range("2026-01-01T10:00:00Z", "2026-01-01T11:00:00Z");
        for _ in 0..3 {
            let _ = repo.insert(R1, &r).await;
        }
        let Ok(list) = repo.list().await else {
            panic!("list failed");
        };
        let ids: Vec<i64> = list.iter().map(|b| b.id.get()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn guarded_update_only_applies_from_expected_status() {
        let repo = InMemoryBookingRepository::new();
        let Ok(id) = repo
            .insert(R1, &range("2026-01-01T10:00:00Z", "2026-01-01T11:00:00Z"))
            .await
        else {
            panic!("insert failed");
        };

        let first = repo
            .set_status_if(id, BookingStatus::Pending, BookingStatus::Approved)
            .await;
        assert!(matches!(first, Ok(true)));

        let second = repo
            .set_status_if(id, BookingStatus::Pending, BookingStatus::Cancelled)
            .await;
        assert!(matches!(second, Ok(false)));
        assert!(matches!(repo.get(id).await, Ok(Some(b)) if b.status == BookingStatus::Approved));

        let missing = repo
            .set_status_if(BookingId::new(99), BookingStatus::Pending, BookingStatus::Approved)
            .await;
        assert!(matches!(missing, Ok(false)));
    }

    #[tokio::test]
    async fn set_status_on_missing_row_reports_false() {
        let repo = InMemoryBookingRepository::new();
        let result = repo.set_status(BookingId::new(99), BookingStatus::Approved).await;
        assert!(matches!(result, Ok(false)));
    }
}
