use crate::exception::DomainError;
use crate::server::address::translate;
use crate::server::connection::Connection;
use crate::server::request::RequestPdu;
use crate::server::response::ResponsePdu;
use crate::types::{AddressRange, Indexed, TableKind};

/// Signature shared by every request handler in the dispatch table
pub(crate) type Handler = fn(&RequestPdu, &mut dyn Connection) -> Result<ResponsePdu, DomainError>;

fn read_bits(
    conn: &mut dyn Connection,
    table: TableKind,
    range: AddressRange,
) -> Result<Vec<bool>, DomainError> {
    Ok(conn.read_bits(translate(table, range.start), range.count)?)
}

fn read_registers(
    conn: &mut dyn Connection,
    table: TableKind,
    range: AddressRange,
) -> Result<Vec<u16>, DomainError> {
    Ok(conn.read_registers(translate(table, range.start), range.count)?)
}

pub(crate) fn read_coils(
    request: &RequestPdu,
    conn: &mut dyn Connection,
) -> Result<ResponsePdu, DomainError> {
    match request {
        RequestPdu::ReadCoils(range) => Ok(ResponsePdu::ReadCoils(read_bits(
            conn,
            TableKind::Coils,
            *range,
        )?)),
        _ => Err(DomainError::DeviceFailure),
    }
}

pub(crate) fn read_discrete_inputs(
    request: &RequestPdu,
    conn: &mut dyn Connection,
) -> Result<ResponsePdu, DomainError> {
    match request {
        RequestPdu::ReadDiscreteInputs(range) => Ok(ResponsePdu::ReadDiscreteInputs(read_bits(
            conn,
            TableKind::DiscreteInputs,
            *range,
        )?)),
        _ => Err(DomainError::DeviceFailure),
    }
}

pub(crate) fn read_holding_registers(
    request: &RequestPdu,
    conn: &mut dyn Connection,
) -> Result<ResponsePdu, DomainError> {
    match request {
        RequestPdu::ReadHoldingRegisters(range) => Ok(ResponsePdu::ReadHoldingRegisters(
            read_registers(conn, TableKind::HoldingRegisters, *range)?,
        )),
        _ => Err(DomainError::DeviceFailure),
    }
}

pub(crate) fn read_input_registers(
    request: &RequestPdu,
    conn: &mut dyn Connection,
) -> Result<ResponsePdu, DomainError> {
    match request {
        RequestPdu::ReadInputRegisters(range) => Ok(ResponsePdu::ReadInputRegisters(
            read_registers(conn, TableKind::InputRegisters, *range)?,
        )),
        _ => Err(DomainError::DeviceFailure),
    }
}

pub(crate) fn write_single_coil(
    request: &RequestPdu,
    conn: &mut dyn Connection,
) -> Result<ResponsePdu, DomainError> {
    match request {
        RequestPdu::WriteSingleCoil(value) => {
            let applied = conn.write_bit(translate(TableKind::Coils, value.index), value.value)?;
            Ok(ResponsePdu::WriteSingleCoil(Indexed::new(
                value.index,
                applied,
            )))
        }
        _ => Err(DomainError::DeviceFailure),
    }
}

pub(crate) fn write_multiple_registers(
    request: &RequestPdu,
    conn: &mut dyn Connection,
) -> Result<ResponsePdu, DomainError> {
    match request {
        RequestPdu::WriteMultipleRegisters(write) => {
            let written = conn.write_registers(
                translate(TableKind::HoldingRegisters, write.start),
                &write.values,
            )?;
            Ok(ResponsePdu::WriteMultipleRegisters(AddressRange::new(
                write.start,
                written,
            )))
        }
        _ => Err(DomainError::DeviceFailure),
    }
}
