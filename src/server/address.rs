use crate::types::TableKind;

/// Base entity number of each table in the classic Modbus data-model
/// numbering: coils are 1-based, input status starts at 10001, input
/// registers at 30001 and holding registers at 40001.
pub(crate) fn table_base(table: TableKind) -> u32 {
    match table {
        TableKind::Coils => 1,
        TableKind::DiscreteInputs => 10_001,
        TableKind::InputRegisters => 30_001,
        TableKind::HoldingRegisters => 40_001,
    }
}

/// Translate a wire protocol address into a storage index.
///
/// Pure and total over all table kinds; range checking belongs to the storage
/// backend, not to the translation.
pub fn translate(table: TableKind, address: u16) -> u32 {
    table_base(table) + address as u32
}
