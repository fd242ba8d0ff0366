use crate::common::function::FunctionCode;
use crate::server::handlers::{self, Handler};

/// One dispatch entry: the request kind it answers, the handler that runs,
/// and the response kind the handler is declared to produce.
pub(crate) struct Entry {
    pub(crate) request: FunctionCode,
    pub(crate) handler: Handler,
    pub(crate) response: FunctionCode,
}

impl Entry {
    const fn new(request: FunctionCode, handler: Handler, response: FunctionCode) -> Self {
        Entry {
            request,
            handler,
            response,
        }
    }
}

/// Immutable table mapping request kinds to handlers. Constructed once and
/// owned by the [Server](crate::server::Server); lookup is by the request
/// PDU's enum tag, never by raw numeric code.
pub(crate) struct DispatchTable {
    entries: [Entry; 6],
}

impl DispatchTable {
    pub(crate) fn new() -> Self {
        DispatchTable {
            entries: [
                Entry::new(
                    FunctionCode::ReadCoils,
                    handlers::read_coils,
                    FunctionCode::ReadCoils,
                ),
                Entry::new(
                    FunctionCode::ReadDiscreteInputs,
                    handlers::read_discrete_inputs,
                    FunctionCode::ReadDiscreteInputs,
                ),
                Entry::new(
                    FunctionCode::ReadHoldingRegisters,
                    handlers::read_holding_registers,
                    FunctionCode::ReadHoldingRegisters,
                ),
                Entry::new(
                    FunctionCode::ReadInputRegisters,
                    handlers::read_input_registers,
                    FunctionCode::ReadInputRegisters,
                ),
                Entry::new(
                    FunctionCode::WriteSingleCoil,
                    handlers::write_single_coil,
                    FunctionCode::WriteSingleCoil,
                ),
                Entry::new(
                    FunctionCode::WriteMultipleRegisters,
                    handlers::write_multiple_registers,
                    FunctionCode::WriteMultipleRegisters,
                ),
            ],
        }
    }

    pub(crate) fn lookup(&self, function: FunctionCode) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.request == function)
    }
}
