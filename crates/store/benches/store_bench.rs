use common::TableId;
use criterion::{Criterion, criterion_group, criterion_main};
use store::{InMemoryCollection, Journal, JournalEntry, JournalQuery, Record, StoreError};

#[derive(Clone)]
struct Seat {
    id: TableId,
    taken: bool,
}

impl Record for Seat {
    type Id = TableId;

    fn record_type() -> &'static str {
        "Seat"
    }

    fn id(&self) -> TableId {
        self.id
    }
}

async fn seeded(count: u32) -> InMemoryCollection<Seat> {
    let collection = InMemoryCollection::default();
    collection
        .seed((1..=count).map(|n| Seat {
            id: TableId::new(n),
            taken: false,
        }))
        .await;
    collection
}

fn bench_insert(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let collection = rt.block_on(seeded(100));

    c.bench_function("store/insert", |b| {
        b.iter(|| {
            rt.block_on(async {
                collection
                    .insert_with(|id, _| Ok::<_, StoreError>((Seat { id, taken: false }, id)))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_update_first(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("store/update_first_of_50", |b| {
        b.iter(|| {
            rt.block_on(async {
                let collection = seeded(50).await;
                for _ in 0..50 {
                    collection
                        .update_first(
                            |s| !s.taken,
                            |s| {
                                s.taken = true;
                                Ok::<_, StoreError>(s.id)
                            },
                        )
                        .await
                        .unwrap();
                }
            });
        });
    });
}

fn bench_journal_query(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let journal = Journal::new();
    rt.block_on(async {
        let entries = (0..1000)
            .map(|n| {
                let record_type = if n % 2 == 0 { "Table" } else { "Order" };
                JournalEntry::new(record_type, n % 20, "Changed", serde_json::json!({}))
            })
            .collect();
        journal.append(entries).await;
    });

    c.bench_function("store/journal_query_newest_10", |b| {
        b.iter(|| {
            rt.block_on(async {
                journal
                    .query(&JournalQuery::new().record_type("Table").newest_first().limit(10))
                    .await
            })
        });
    });
}

criterion_group!(benches, bench_insert, bench_update_first, bench_journal_query);
criterion_main!(benches);
