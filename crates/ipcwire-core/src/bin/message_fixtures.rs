use std::fs;
use std::path::{Path, PathBuf};

use ipcwire_core::message::layout::{
    FIELD_DESTINATION, FIELD_INTERFACE, FIELD_MEMBER, FIELD_PATH, FIELD_REPLY_SERIAL, FIELD_SENDER,
    FIELD_SIGNATURE, FIELDS_LEN_RANGE, FLAG_NO_REPLY_EXPECTED, LITTLE_ENDIAN, PROTOCOL_VERSION,
    TYPE_METHOD_CALL, TYPE_METHOD_RETURN, TYPE_SIGNAL,
};

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_message(&root.join("minimal").join("input.bin"), &minimal())?;
    write_message(&root.join("method_call").join("input.bin"), &method_call())?;
    write_message(&root.join("signal_struct").join("input.bin"), &signal_struct())?;
    Ok(())
}

fn write_message(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
    }
    fs::write(path, bytes).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}

/// METHOD_RETURN with only a reply serial and no body.
fn minimal() -> Vec<u8> {
    let spec = MessageSpec {
        message_type: TYPE_METHOD_RETURN,
        flags: 0,
        serial: 2,
        fields: vec![Field::Uint32(FIELD_REPLY_SERIAL, 1)],
    };
    build_message(&spec, &[])
}

/// METHOD_CALL carrying `sa{sv}`.
fn method_call() -> Vec<u8> {
    let spec = MessageSpec {
        message_type: TYPE_METHOD_CALL,
        flags: 0,
        serial: 7,
        fields: vec![
            Field::ObjectPath(FIELD_PATH, "/org/example/Echo"),
            Field::Text(FIELD_INTERFACE, "org.example.Echo"),
            Field::Text(FIELD_MEMBER, "Ping"),
            Field::Text(FIELD_DESTINATION, "org.example.Service"),
            Field::Signature(FIELD_SIGNATURE, "sa{sv}"),
        ],
    };

    let mut body = Encoder::default();
    body.string("hello");
    body.array(8, |enc| {
        enc.dict_entry(|enc| {
            enc.string("count");
            enc.signature("u");
            enc.u32(7);
        });
        enc.dict_entry(|enc| {
            enc.string("name");
            enc.signature("s");
            enc.string("echo");
        });
    });
    build_message(&spec, &body.bytes)
}

/// SIGNAL carrying `(yqx)ad`, sent without reply.
fn signal_struct() -> Vec<u8> {
    let spec = MessageSpec {
        message_type: TYPE_SIGNAL,
        flags: FLAG_NO_REPLY_EXPECTED,
        serial: 42,
        fields: vec![
            Field::ObjectPath(FIELD_PATH, "/org/example"),
            Field::Text(FIELD_INTERFACE, "org.example.Events"),
            Field::Text(FIELD_MEMBER, "Changed"),
            Field::Text(FIELD_SENDER, ":1.42"),
            Field::Signature(FIELD_SIGNATURE, "(yqx)ad"),
        ],
    };

    let mut body = Encoder::default();
    body.pad(8);
    body.byte(5);
    body.pad(2);
    body.bytes.extend_from_slice(&300u16.to_le_bytes());
    body.pad(8);
    body.bytes.extend_from_slice(&(-2i64).to_le_bytes());
    body.array(8, |enc| {
        enc.bytes.extend_from_slice(&1.5f64.to_le_bytes());
        enc.bytes.extend_from_slice(&(-0.25f64).to_le_bytes());
    });
    build_message(&spec, &body.bytes)
}

struct MessageSpec {
    message_type: u8,
    flags: u8,
    serial: u32,
    fields: Vec<Field>,
}

enum Field {
    ObjectPath(u8, &'static str),
    Text(u8, &'static str),
    Signature(u8, &'static str),
    Uint32(u8, u32),
}

fn build_message(spec: &MessageSpec, body: &[u8]) -> Vec<u8> {
    let mut enc = Encoder::default();
    enc.bytes
        .extend_from_slice(&[LITTLE_ENDIAN, spec.message_type, spec.flags, PROTOCOL_VERSION]);
    enc.u32(body.len() as u32);
    enc.u32(spec.serial);
    enc.u32(0);

    for field in &spec.fields {
        enc.pad(8);
        match *field {
            Field::ObjectPath(id, path) => {
                enc.byte(id);
                enc.signature("o");
                enc.string(path);
            }
            Field::Text(id, text) => {
                enc.byte(id);
                enc.signature("s");
                enc.string(text);
            }
            Field::Signature(id, sig) => {
                enc.byte(id);
                enc.signature("g");
                enc.signature(sig);
            }
            Field::Uint32(id, value) => {
                enc.byte(id);
                enc.signature("u");
                enc.u32(value);
            }
        }
    }

    let fields_len = (enc.bytes.len() - FIELDS_LEN_RANGE.end) as u32;
    enc.bytes[FIELDS_LEN_RANGE].copy_from_slice(&fields_len.to_le_bytes());
    enc.pad(8);
    enc.bytes.extend_from_slice(body);
    enc.bytes
}

/// Little-endian writer; offsets are relative to the first byte written.
#[derive(Default)]
struct Encoder {
    bytes: Vec<u8>,
}

impl Encoder {
    fn pad(&mut self, align: usize) {
        while self.bytes.len() % align != 0 {
            self.bytes.push(0);
        }
    }

    fn byte(&mut self, value: u8) {
        self.bytes.push(value);
    }

    fn u32(&mut self, value: u32) {
        self.pad(4);
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    fn string(&mut self, text: &str) {
        self.u32(text.len() as u32);
        self.bytes.extend_from_slice(text.as_bytes());
        self.bytes.push(0);
    }

    fn signature(&mut self, sig: &str) {
        self.bytes.push(sig.len() as u8);
        self.bytes.extend_from_slice(sig.as_bytes());
        self.bytes.push(0);
    }

    fn array(&mut self, element_align: usize, elements: impl FnOnce(&mut Encoder)) {
        self.u32(0);
        let len_at = self.bytes.len() - 4;
        self.pad(element_align);
        let start = self.bytes.len();
        elements(self);
        let byte_count = (self.bytes.len() - start) as u32;
        self.bytes[len_at..len_at + 4].copy_from_slice(&byte_count.to_le_bytes());
    }

    fn dict_entry(&mut self, members: impl FnOnce(&mut Encoder)) {
        self.pad(8);
        members(self);
    }
}
