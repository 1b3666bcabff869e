//! # Cola Acotada Sincronizada
//! src/pool/queue.rs
//!
//! Cola FIFO thread-safe con capacidad fija. Los productores se bloquean
//! cuando la cola está llena (backpressure) y los consumidores cuando está
//! vacía. `shutdown()` despierta a todos los que estén esperando.
//!
//! ## Disciplina de señales
//!
//! - `push` exitoso → `not_empty.notify_one()`
//! - `pop` exitoso → `not_full.notify_one()`
//! - `shutdown` → `notify_all()` en ambas condiciones
//!
//! Toda espera vuelve a verificar su condición en un loop.

use crate::error::Rejected;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Resultado de `pop`
#[derive(Debug, PartialEq, Eq)]
pub enum Popped<T> {
    /// Un item de la cabeza de la cola
    Item(T),

    /// Shutdown señalado y cola vacía: el worker debe terminar
    Drained,
}

/// Estado protegido por el mutex
struct QueueState<T> {
    items: VecDeque<T>,
    shutting_down: bool,
}

/// Cola FIFO acotada para productores/consumidores
pub struct BoundedQueue<T> {
    state: Mutex<QueueState<T>>,

    /// Se señala cuando entra un item
    not_empty: Condvar,

    /// Se señala cuando sale un item
    not_full: Condvar,

    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Crea una cola con capacidad fija (debe ser >= 1, lo valida el pool)
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                shutting_down: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola un item al final.
    ///
    /// Bloquea mientras la cola esté llena. Si se señala shutdown (antes o
    /// durante la espera) retorna `Err(Rejected(item))` y el caller conserva
    /// el item.
    pub fn push(&self, item: T) -> Result<(), Rejected<T>> {
        let mut state = self.lock();

        while state.items.len() >= self.capacity && !state.shutting_down {
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        if state.shutting_down {
            return Err(Rejected(item));
        }

        state.items.push_back(item);
        drop(state);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Desencola el item de la cabeza.
    ///
    /// Bloquea mientras la cola esté vacía. Retorna `Popped::Drained` solo
    /// cuando hay shutdown **y** la cola está vacía; los items que quedaban
    /// se siguen entregando hasta vaciarla.
    pub fn pop(&self) -> Popped<T> {
        let mut state = self.lock();

        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Popped::Item(item);
            }

            if state.shutting_down {
                return Popped::Drained;
            }

            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Intenta desencolar sin bloquear
    pub fn try_pop(&self) -> Option<T> {
        let item = self.lock().items.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Marca la cola como cerrada y despierta a todos los threads en espera.
    /// Idempotente.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.shutting_down = true;
        drop(state);

        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// Remueve todos los items restantes y llama `disposer` sobre cada uno.
    ///
    /// Lo usa el pool después de unir a todos los workers. Retorna cuántos
    /// items se liberaron.
    pub fn drain_and_dispose<F>(&self, mut disposer: F) -> usize
    where
        F: FnMut(T),
    {
        let mut count = 0;
        while let Some(item) = self.try_pop() {
            disposer(item);
            count += 1;
        }

        self.lock().items.shrink_to_fit();
        self.not_full.notify_all();
        count
    }

    /// Tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retorna la capacidad máxima
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Verifica si ya se señaló shutdown
    pub fn is_shutting_down(&self) -> bool {
        self.lock().shutting_down
    }
}
