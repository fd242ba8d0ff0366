use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::server::address::table_base;
use crate::server::connection::{Connection, StorageError};
use crate::types::TableKind;

/// A storage backend holding the device memory served to clients.
///
/// Indices are the storage indices produced by
/// [translate](crate::server::translate). Backends perform all range and
/// value validation; the transaction engine only translates addresses.
pub trait Storage: Send + 'static {
    /// Read `count` single-bit values starting at `index`
    fn read_bits(&mut self, index: u32, count: u16) -> Result<Vec<bool>, StorageError>;

    /// Read `count` 16-bit registers starting at `index`
    fn read_registers(&mut self, index: u32, count: u16) -> Result<Vec<u16>, StorageError>;

    /// Write a single bit, returning the value actually applied
    fn write_bit(&mut self, index: u32, value: bool) -> Result<bool, StorageError>;

    /// Write a block of registers, returning the count written
    fn write_registers(&mut self, index: u32, values: &[u16]) -> Result<u16, StorageError>;
}

/// Shared handle to a storage backend. One backend may serve many sessions.
pub type StorageType<S> = Arc<Mutex<S>>;

/// Binds a shared storage backend to one session, queueing outgoing frames
/// so the session task can flush them to the socket.
pub struct StorageConnection<S: Storage> {
    storage: StorageType<S>,
    outgoing: VecDeque<Vec<u8>>,
}

impl<S: Storage> StorageConnection<S> {
    /// Create a connection over a shared storage backend
    pub fn new(storage: StorageType<S>) -> Self {
        StorageConnection {
            storage,
            outgoing: VecDeque::new(),
        }
    }

    /// Remove the next queued frame, if any
    pub fn pop_frame(&mut self) -> Option<Vec<u8>> {
        self.outgoing.pop_front()
    }

    fn with_storage<T>(
        &mut self,
        op: impl FnOnce(&mut S) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        match self.storage.lock() {
            Ok(mut guard) => op(&mut guard),
            Err(_) => Err(StorageError::Internal), // poisoned by a panicked holder
        }
    }
}

impl<S: Storage> Connection for StorageConnection<S> {
    fn send(&mut self, frame: &[u8]) {
        self.outgoing.push_back(frame.to_vec());
    }

    fn read_bits(&mut self, index: u32, count: u16) -> Result<Vec<bool>, StorageError> {
        self.with_storage(|storage| storage.read_bits(index, count))
    }

    fn read_registers(&mut self, index: u32, count: u16) -> Result<Vec<u16>, StorageError> {
        self.with_storage(|storage| storage.read_registers(index, count))
    }

    fn write_bit(&mut self, index: u32, value: bool) -> Result<bool, StorageError> {
        self.with_storage(|storage| storage.write_bit(index, value))
    }

    fn write_registers(&mut self, index: u32, values: &[u16]) -> Result<u16, StorageError> {
        self.with_storage(|storage| storage.write_registers(index, values))
    }
}

/// In-memory storage backend over plain vectors, laid out according to the
/// classic data-model numbering. Useful for device simulators and tests.
pub struct InMemoryStorage {
    coils: Vec<bool>,
    discrete_inputs: Vec<bool>,
    input_registers: Vec<u16>,
    holding_registers: Vec<u16>,
}

impl InMemoryStorage {
    /// Allocate zeroed tables of the given sizes
    pub fn new(
        coils: usize,
        discrete_inputs: usize,
        input_registers: usize,
        holding_registers: usize,
    ) -> Self {
        InMemoryStorage {
            coils: vec![false; coils],
            discrete_inputs: vec![false; discrete_inputs],
            input_registers: vec![0; input_registers],
            holding_registers: vec![0; holding_registers],
        }
    }

    /// Seed a discrete input for test or simulation purposes
    pub fn set_discrete_input(&mut self, offset: usize, value: bool) {
        if let Some(slot) = self.discrete_inputs.get_mut(offset) {
            *slot = value;
        }
    }

    /// Seed an input register for test or simulation purposes
    pub fn set_input_register(&mut self, offset: usize, value: u16) {
        if let Some(slot) = self.input_registers.get_mut(offset) {
            *slot = value;
        }
    }

    /// Current value of a coil, if the offset is valid
    pub fn coil(&self, offset: usize) -> Option<bool> {
        self.coils.get(offset).copied()
    }

    /// Current value of a holding register, if the offset is valid
    pub fn holding_register(&self, offset: usize) -> Option<u16> {
        self.holding_registers.get(offset).copied()
    }

    /// Map a storage index onto a table and the zero-based offset into it
    fn locate(&self, index: u32) -> Option<(TableKind, usize)> {
        let table = match index {
            i if i >= table_base(TableKind::HoldingRegisters) => TableKind::HoldingRegisters,
            i if i >= table_base(TableKind::InputRegisters) => TableKind::InputRegisters,
            i if i >= table_base(TableKind::DiscreteInputs) => TableKind::DiscreteInputs,
            i if i >= table_base(TableKind::Coils) => TableKind::Coils,
            _ => return None,
        };
        Some((table, (index - table_base(table)) as usize))
    }
}

fn read_slice<T: Copy>(values: &[T], offset: usize, count: u16) -> Result<Vec<T>, StorageError> {
    let end = offset
        .checked_add(count as usize)
        .ok_or(StorageError::AddressOutOfRange)?;
    match values.get(offset..end) {
        Some(slice) => Ok(slice.to_vec()),
        None => Err(StorageError::AddressOutOfRange),
    }
}

impl Storage for InMemoryStorage {
    fn read_bits(&mut self, index: u32, count: u16) -> Result<Vec<bool>, StorageError> {
        match self.locate(index) {
            Some((TableKind::Coils, offset)) => read_slice(&self.coils, offset, count),
            Some((TableKind::DiscreteInputs, offset)) => {
                read_slice(&self.discrete_inputs, offset, count)
            }
            _ => Err(StorageError::AddressOutOfRange),
        }
    }

    fn read_registers(&mut self, index: u32, count: u16) -> Result<Vec<u16>, StorageError> {
        match self.locate(index) {
            Some((TableKind::InputRegisters, offset)) => {
                read_slice(&self.input_registers, offset, count)
            }
            Some((TableKind::HoldingRegisters, offset)) => {
                read_slice(&self.holding_registers, offset, count)
            }
            _ => Err(StorageError::AddressOutOfRange),
        }
    }

    fn write_bit(&mut self, index: u32, value: bool) -> Result<bool, StorageError> {
        match self.locate(index) {
            Some((TableKind::Coils, offset)) => match self.coils.get_mut(offset) {
                Some(slot) => {
                    *slot = value;
                    Ok(value)
                }
                None => Err(StorageError::AddressOutOfRange),
            },
            _ => Err(StorageError::AddressOutOfRange),
        }
    }

    fn write_registers(&mut self, index: u32, values: &[u16]) -> Result<u16, StorageError> {
        match self.locate(index) {
            Some((TableKind::HoldingRegisters, offset)) => {
                let end = offset
                    .checked_add(values.len())
                    .ok_or(StorageError::AddressOutOfRange)?;
                match self.holding_registers.get_mut(offset..end) {
                    Some(slice) => {
                        slice.copy_from_slice(values);
                        Ok(values.len() as u16)
                    }
                    None => Err(StorageError::AddressOutOfRange),
                }
            }
            _ => Err(StorageError::AddressOutOfRange),
        }
    }
}
