use std::sync::{Arc, Mutex};

use mbserver::prelude::*;
use mbserver::tcp::frame::decode_response;

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn frame(tx_id: u16, unit_id: u8, pdu: &[u8]) -> Vec<u8> {
    let length = (pdu.len() + 1) as u16;
    let mut frame = vec![
        (tx_id >> 8) as u8,
        tx_id as u8,
        0x00,
        0x00,
        (length >> 8) as u8,
        length as u8,
        unit_id,
    ];
    frame.extend_from_slice(pdu);
    frame
}

fn connection() -> StorageConnection<InMemoryStorage> {
    StorageConnection::new(Arc::new(Mutex::new(InMemoryStorage::new(16, 16, 16, 16))))
}

/// Run one request through the engine and return the single response frame
fn transact(conn: &mut StorageConnection<InMemoryStorage>, request: &[u8]) -> Vec<u8> {
    let server = Server::new();
    let mut buffer = ReadBuffer::new(64);
    buffer.append(request);
    assert!(server.receive(&mut buffer, conn).unwrap());
    let response = conn.pop_frame().unwrap();
    assert!(conn.pop_frame().is_none());
    response
}

#[test]
fn echoes_the_transaction_id_and_unit_id_for_every_supported_function() {
    init_logging();
    let requests: &[&[u8]] = &[
        &[0x01, 0x00, 0x00, 0x00, 0x02], // read coils
        &[0x02, 0x00, 0x00, 0x00, 0x02], // read discrete inputs
        &[0x03, 0x00, 0x00, 0x00, 0x01], // read holding registers
        &[0x04, 0x00, 0x00, 0x00, 0x01], // read input registers
        &[0x05, 0x00, 0x01, 0xFF, 0x00], // write single coil
        &[0x10, 0x00, 0x00, 0x00, 0x01, 0x02, 0x00, 0x2A], // write multiple registers
    ];

    let mut conn = connection();
    for (seq, pdu) in requests.iter().enumerate() {
        let tx_id = 0x4000 + seq as u16;
        let response = transact(&mut conn, &frame(tx_id, 0x2A, pdu));
        assert_eq!(&response[0..2], &[(tx_id >> 8) as u8, tx_id as u8]);
        assert_eq!(response[6], 0x2A);
        assert_eq!(response[7], pdu[0]);
    }
}

#[test]
fn reads_holding_registers_written_by_an_earlier_request() {
    init_logging();
    let mut conn = connection();

    // write registers 10 and 20 at address 0, then read them back
    let write = frame(
        0x0001,
        0x01,
        &[0x10, 0x00, 0x00, 0x00, 0x02, 0x04, 0x00, 0x0A, 0x00, 0x14],
    );
    let response = transact(&mut conn, &write);
    assert_eq!(&response[7..], &[0x10, 0x00, 0x00, 0x00, 0x02]);

    let read_request = RequestAdu {
        header: FrameHeader::new(UnitId::new(0x01), TxId::new(0x0002)),
        pdu: RequestPdu::ReadHoldingRegisters(AddressRange::new(0, 2)),
    };
    let response = transact(&mut conn, &frame(0x0002, 0x01, &[0x03, 0x00, 0x00, 0x00, 0x02]));
    let decoded = decode_response(&response, &read_request).unwrap();
    assert_eq!(decoded.header, read_request.header);
    assert_eq!(
        decoded.pdu,
        ResponsePdu::ReadHoldingRegisters(vec![0x000A, 0x0014])
    );
}

#[test]
fn echoes_the_applied_coil_value_and_makes_it_visible_to_reads() {
    init_logging();
    let mut conn = connection();

    let response = transact(&mut conn, &frame(0x0001, 0x01, &[0x05, 0x00, 0x05, 0xFF, 0x00]));
    assert_eq!(&response[7..], &[0x05, 0x00, 0x05, 0xFF, 0x00]);

    let response = transact(&mut conn, &frame(0x0002, 0x01, &[0x01, 0x00, 0x05, 0x00, 0x01]));
    assert_eq!(&response[7..], &[0x01, 0x01, 0x01]);
}

#[test]
fn answers_an_unsupported_function_with_an_illegal_function_exception() {
    init_logging();
    let mut conn = connection();

    // 0x0F (write multiple coils) has no dispatch entry
    let response = transact(
        &mut conn,
        &frame(0x0BEE, 0x01, &[0x0F, 0x00, 0x00, 0x00, 0x08, 0x01, 0xFF]),
    );
    assert_eq!(response, frame(0x0BEE, 0x01, &[0x8F, 0x01]));
}

#[test]
fn answers_an_out_of_range_write_with_an_illegal_address_exception() {
    init_logging();
    let mut conn = connection();

    // storage holds 16 registers, so a 3-register write at 100 must fail
    let response = transact(
        &mut conn,
        &frame(
            0x0003,
            0x01,
            &[0x10, 0x00, 0x64, 0x00, 0x03, 0x06, 0x00, 0x01, 0x00, 0x02, 0x00, 0x03],
        ),
    );
    assert_eq!(response, frame(0x0003, 0x01, &[0x90, 0x02]));
}

#[derive(Debug, PartialEq, Eq)]
enum Call {
    ReadBits(u32, u16),
    ReadRegisters(u32, u16),
    WriteBit(u32, bool),
    WriteRegisters(u32, Vec<u16>),
}

/// Records every storage access so tests can assert on side effects
struct RecordingConnection {
    calls: Vec<Call>,
    frames: Vec<Vec<u8>>,
}

impl RecordingConnection {
    fn new() -> Self {
        RecordingConnection {
            calls: Vec::new(),
            frames: Vec::new(),
        }
    }
}

impl Connection for RecordingConnection {
    fn send(&mut self, frame: &[u8]) {
        self.frames.push(frame.to_vec());
    }

    fn read_bits(&mut self, index: u32, count: u16) -> Result<Vec<bool>, StorageError> {
        self.calls.push(Call::ReadBits(index, count));
        Ok(vec![false; count as usize])
    }

    fn read_registers(&mut self, index: u32, count: u16) -> Result<Vec<u16>, StorageError> {
        self.calls.push(Call::ReadRegisters(index, count));
        Ok(vec![0; count as usize])
    }

    fn write_bit(&mut self, index: u32, value: bool) -> Result<bool, StorageError> {
        self.calls.push(Call::WriteBit(index, value));
        Ok(value)
    }

    fn write_registers(&mut self, index: u32, values: &[u16]) -> Result<u16, StorageError> {
        self.calls.push(Call::WriteRegisters(index, values.to_vec()));
        Ok(values.len() as u16)
    }
}

#[test]
fn a_truncated_frame_produces_no_side_effects() {
    init_logging();
    let server = Server::new();
    let mut conn = RecordingConnection::new();
    let mut buffer = ReadBuffer::new(64);

    let request = frame(0x0001, 0x01, &[0x03, 0x00, 0x00, 0x00, 0x02]);
    buffer.append(&request[..request.len() - 1]);

    assert!(!server.receive(&mut buffer, &mut conn).unwrap());
    assert!(conn.calls.is_empty());
    assert!(conn.frames.is_empty());
    assert_eq!(buffer.len(), request.len() - 1);

    // delivering the missing byte completes the transaction
    buffer.append(&request[request.len() - 1..]);
    assert!(server.receive(&mut buffer, &mut conn).unwrap());
    assert_eq!(
        conn.calls,
        vec![Call::ReadRegisters(translate(TableKind::HoldingRegisters, 0), 2)]
    );
    assert_eq!(conn.frames.len(), 1);
}

#[test]
fn handlers_receive_translated_storage_indices() {
    init_logging();
    let server = Server::new();
    let mut conn = RecordingConnection::new();
    let mut buffer = ReadBuffer::new(256);

    buffer.append(&frame(0x0001, 0x01, &[0x01, 0x00, 0x07, 0x00, 0x01]));
    buffer.append(&frame(0x0002, 0x01, &[0x02, 0x00, 0x07, 0x00, 0x01]));
    buffer.append(&frame(0x0003, 0x01, &[0x03, 0x00, 0x07, 0x00, 0x01]));
    buffer.append(&frame(0x0004, 0x01, &[0x04, 0x00, 0x07, 0x00, 0x01]));

    while server.receive(&mut buffer, &mut conn).unwrap() {}

    assert_eq!(
        conn.calls,
        vec![
            Call::ReadBits(8, 1),
            Call::ReadBits(10_008, 1),
            Call::ReadRegisters(40_008, 1),
            Call::ReadRegisters(30_008, 1),
        ]
    );
}

#[test]
fn processes_every_frame_of_a_pipelined_delivery_in_order() {
    init_logging();
    let mut conn = connection();
    let server = Server::new();
    let mut buffer = ReadBuffer::new(256);

    buffer.append(&frame(0x0001, 0x01, &[0x05, 0x00, 0x02, 0xFF, 0x00]));
    buffer.append(&frame(0x0002, 0x01, &[0x01, 0x00, 0x02, 0x00, 0x01]));

    while server.receive(&mut buffer, &mut conn).unwrap() {}

    assert_eq!(
        conn.pop_frame().unwrap(),
        frame(0x0001, 0x01, &[0x05, 0x00, 0x02, 0xFF, 0x00])
    );
    assert_eq!(
        conn.pop_frame().unwrap(),
        frame(0x0002, 0x01, &[0x01, 0x01, 0x01])
    );
    assert!(conn.pop_frame().is_none());
}
