use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A single row of the table. The core never looks inside, only the
/// column accessors do.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub visits: u32,
    pub status: String,
    pub progress: u32,
}

pub struct ColumnDef {
    pub id: &'static str,
    pub label: &'static str,
    pub accessor: fn(&Person) -> String,
}

impl ColumnDef {
    pub fn value(&self, record: &Person) -> String {
        (self.accessor)(record)
    }
}

impl std::fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}

fn first_name(p: &Person) -> String {
    p.first_name.clone()
}

fn last_name(p: &Person) -> String {
    p.last_name.clone()
}

fn age(p: &Person) -> String {
    p.age.to_string()
}

fn visits(p: &Person) -> String {
    p.visits.to_string()
}

fn status(p: &Person) -> String {
    p.status.clone()
}

fn progress(p: &Person) -> String {
    p.progress.to_string()
}

static REGISTRY: [ColumnDef; 6] = [
    ColumnDef {
        id: "firstName",
        label: "First Name",
        accessor: first_name,
    },
    ColumnDef {
        id: "lastName",
        label: "Last Name",
        accessor: last_name,
    },
    ColumnDef {
        id: "age",
        label: "Age",
        accessor: age,
    },
    ColumnDef {
        id: "visits",
        label: "Visits",
        accessor: visits,
    },
    ColumnDef {
        id: "status",
        label: "Status",
        accessor: status,
    },
    ColumnDef {
        id: "progress",
        label: "Progress",
        accessor: progress,
    },
];

/// All known columns in their natural order.
pub fn registry() -> &'static [ColumnDef] {
    &REGISTRY
}

pub fn column_ids(registry: &[ColumnDef]) -> Vec<String> {
    registry.iter().map(|c| c.id.to_string()).collect()
}

pub fn find_column<'a>(registry: &'a [ColumnDef], id: &str) -> Option<&'a ColumnDef> {
    registry.iter().find(|c| c.id == id)
}

/// Synthetic person records. A seed makes the data reproducible.
pub fn generate_rows(count: usize, seed: Option<u64>) -> Vec<Person> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    (0..count)
        .map(|_| Person {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            age: rng.gen_range(20..70),
            visits: rng.gen_range(0..100),
            status: "Active".to_string(),
            progress: rng.gen_range(0..100),
        })
        .collect()
}
