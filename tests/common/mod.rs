#![allow(dead_code)]

//! Scripted in-memory store.
//!
//! Records every call the executor makes and fails or stalls where the
//! script says so. Leases count themselves in and out so tests can assert
//! that every lease was released.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use customer_orders_api::unit_of_work::{
    IsolationLevel, Lease, Row, SqlParam, Statement, Store, StoreError,
};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Acquire,
    Begin(IsolationLevel),
    Execute { step: String, params: Vec<SqlParam> },
    Commit,
    Rollback,
    Release,
}

#[derive(Debug, Default)]
pub struct Script {
    pub fail_acquire: Option<StoreError>,
    pub fail_begin: Option<StoreError>,
    pub fail_step: Option<(String, StoreError)>,
    pub fail_commit: Option<StoreError>,
    pub fail_rollback: Option<StoreError>,
    /// Step that never answers.
    pub stall_step: Option<String>,
    pub stall_begin: bool,
    pub stall_commit: bool,
    /// Rows returned per step name; unlisted steps return `{"step": name}`.
    pub rows: HashMap<String, Vec<Row>>,
}

#[derive(Clone, Default)]
pub struct ScriptedStore {
    script: Arc<Script>,
    events: Arc<Mutex<Vec<Event>>>,
    outstanding: Arc<AtomicUsize>,
    discarded: Arc<AtomicUsize>,
}

impl ScriptedStore {
    pub fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn count(&self, wanted: &Event) -> usize {
        self.events.lock().iter().filter(|e| *e == wanted).count()
    }

    /// Names of the steps executed, in order.
    pub fn executed_steps(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Execute { step, .. } => Some(step.clone()),
                _ => None,
            })
            .collect()
    }

    /// Leases handed out and not yet dropped.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Leases dropped while still inside a transaction, i.e. ones a real
    /// pool would close instead of reusing.
    pub fn discarded(&self) -> usize {
        self.discarded.load(Ordering::SeqCst)
    }

    fn record(&self, event: Event) {
        self.events.lock().push(event);
    }
}

pub struct ScriptedLease {
    store: ScriptedStore,
    in_transaction: bool,
}

#[async_trait]
impl Store for ScriptedStore {
    type Lease = ScriptedLease;

    async fn acquire(&self) -> Result<ScriptedLease, StoreError> {
        self.record(Event::Acquire);
        if let Some(err) = &self.script.fail_acquire {
            return Err(err.clone());
        }
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedLease {
            store: self.clone(),
            in_transaction: false,
        })
    }
}

#[async_trait]
impl Lease for ScriptedLease {
    async fn begin(&mut self, isolation: IsolationLevel) -> Result<(), StoreError> {
        self.store.record(Event::Begin(isolation));
        self.in_transaction = true;
        if self.store.script.stall_begin {
            stall().await;
        }
        match &self.store.script.fail_begin {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn execute(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        self.store.record(Event::Execute {
            step: statement.name().to_string(),
            params: statement.params().to_vec(),
        });

        let script = &self.store.script;
        if script.stall_step.as_deref() == Some(statement.name()) {
            stall().await;
        }
        if let Some((step, err)) = &script.fail_step {
            if step == statement.name() {
                return Err(err.clone());
            }
        }

        Ok(script
            .rows
            .get(statement.name())
            .cloned()
            .unwrap_or_else(|| vec![row(serde_json::json!({ "step": statement.name() }))]))
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.store.record(Event::Commit);
        if self.store.script.stall_commit {
            stall().await;
        }
        match &self.store.script.fail_commit {
            Some(err) => Err(err.clone()),
            None => {
                self.in_transaction = false;
                Ok(())
            }
        }
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.store.record(Event::Rollback);
        match &self.store.script.fail_rollback {
            Some(err) => Err(err.clone()),
            None => {
                self.in_transaction = false;
                Ok(())
            }
        }
    }
}

impl Drop for ScriptedLease {
    fn drop(&mut self) {
        self.store.record(Event::Release);
        if self.in_transaction {
            self.store.discarded.fetch_add(1, Ordering::SeqCst);
        }
        self.store.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}

async fn stall() {
    tokio::time::sleep(Duration::from_secs(3600)).await;
}

pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn fk_violation() -> StoreError {
    StoreError::new(
        "insert or update on table \"welcome_vouchers\" violates foreign key constraint \"welcome_vouchers_cust_id_fkey\"",
    )
    .with_code("23503")
    .with_constraint("welcome_vouchers_cust_id_fkey")
}
