use airhome_datagram::{
    Datagram, DecodeErrorKind, Encode, MessageBody, MessageHead, MessageId, MessageType,
    Parameter, ParameterType, checksum, escape, unescape,
};
use simplelog::{Config, LevelFilter, TestLogger};

fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

fn sample_body(dev_id: u64, value: u8) -> MessageBody {
    MessageBody::with_parameters(
        MessageId::Multifunction,
        dev_id,
        vec![Parameter::from_byte(ParameterType::PowerSwitch, value)],
    )
}

#[test]
fn decodes_hand_built_frame() {
    init_logger();

    let body: [u8; 14] = [
        0x00, 0x00, // msg id
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, // dev id
        0x00, 0x01, 0x01, 0x05, // parameter
    ];
    let crc = checksum(&body);

    let mut unescaped = vec![
        0x01, // type
        0x00, 0x0B, // length
        0x00, 0x00, 0x00, 0x01, // seq number
        0x00, 0x00, 0x00, // reserved
    ];
    unescaped.extend(crc.to_be_bytes());
    unescaped.extend(body);

    let mut raw = vec![0x02];
    raw.extend(escape(&unescaped));
    raw.push(0x03);

    let datagrams = Datagram::decode_all(&raw).unwrap();
    let expected = Datagram::new(
        MessageHead::server_to_device(0x000B, 1, crc),
        sample_body(1, 0x05),
    );

    assert_eq!(datagrams, vec![expected.clone()]);
    assert_eq!(expected.to_bytes(), raw);
}

#[test]
fn round_trips_through_the_wire() {
    init_logger();

    let body = MessageBody::with_parameters(
        MessageId::Control,
        0x1B02_0300_0000_00FF,
        vec![
            Parameter::from_byte(ParameterType::Mode, 0x02),
            Parameter::from_text(ParameterType::DeviceName, "bedroom").unwrap(),
            Parameter::new(ParameterType::Other(0x0203), [0x1Bu8, 0x03, 0x02]).unwrap(),
        ],
    );
    let datagram = Datagram::from_body(MessageType::ServerToDevice, 0x0203_1B00, body);

    let wire = datagram.to_bytes();
    assert!(!wire[1..wire.len() - 1].iter().any(|&b| b == 0x02 || b == 0x03));

    assert_eq!(Datagram::decode_all(&wire).unwrap(), vec![datagram]);
}

#[test]
fn decodes_back_to_back_frames_in_order() {
    init_logger();

    let first = Datagram::from_body(MessageType::ServerToDevice, 1, sample_body(10, 1));
    let second = Datagram::from_body(MessageType::DeviceToServer, 2, sample_body(20, 0));

    let mut raw = vec![0xFF, 0x00];
    raw.extend(first.to_bytes());
    raw.extend([0x55, 0x03]);
    raw.extend(second.to_bytes());
    raw.push(0x02);

    assert_eq!(Datagram::decode_all(&raw).unwrap(), vec![first, second]);
}

#[test]
fn rejects_input_shorter_than_a_datagram() {
    let err = Datagram::decode_all(&[0x02, 0x01, 0x03]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::CommandFormat { len: 3 });

    let err = Datagram::decode_all(&[]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::CommandFormat { len: 0 });
}

#[test]
fn rejects_flipped_crc() {
    let datagram = Datagram::from_body(MessageType::ServerToDevice, 1, sample_body(1, 5));
    let expected = datagram.head.crc;

    let mut tampered = datagram.clone();
    tampered.head.crc ^= 0x0100;

    let err = Datagram::decode_all(&tampered.to_bytes()).unwrap_err();
    assert_eq!(
        err.kind(),
        DecodeErrorKind::Checksum {
            value: expected ^ 0x0100,
            expected,
        }
    );
}

#[test]
fn rejects_body_without_parameters() {
    let body = MessageBody::for_device(1);
    let datagram = Datagram::from_body(MessageType::ServerToDevice, 1, body);

    let err = Datagram::decode_all(&datagram.to_bytes()).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::ParameterFormat);
}

#[test]
fn first_bad_frame_fails_the_whole_call() {
    let good = Datagram::from_body(MessageType::ServerToDevice, 1, sample_body(1, 5));
    let bad = Datagram::from_body(MessageType::ServerToDevice, 2, MessageBody::for_device(1));

    let mut raw = good.to_bytes();
    raw.extend(bad.to_bytes());
    raw.extend(good.to_bytes());

    let err = Datagram::decode_all(&raw).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::ParameterFormat);
}

#[test]
fn unterminated_frame_yields_nothing() {
    init_logger();

    let datagram = Datagram::from_body(MessageType::ServerToDevice, 1, sample_body(1, 5));
    let mut raw = datagram.to_bytes();
    raw.pop();

    assert!(Datagram::decode_all(&raw).unwrap().is_empty());
}

#[test]
fn unknown_parameter_codes_pass_through() {
    let body = MessageBody::new(MessageId::Report)
        .parameter(Parameter::new(ParameterType::from(0x7777u16), [0x01u8, 0x02]).unwrap());
    let datagram = Datagram::from_body(MessageType::DeviceToServer, 9, body);

    let decoded = Datagram::decode_all(&datagram.to_bytes()).unwrap();
    assert_eq!(
        decoded[0].body.parameters[0].parameter_type,
        ParameterType::Other(0x7777)
    );
}

#[test]
fn trailing_empty_parameter_round_trips() {
    // The placeholder byte written for an empty value is too short to be read
    // as another parameter, so a trailing empty value survives decoding.
    let empty = Parameter::new(ParameterType::Mode, Vec::<u8>::new()).unwrap();
    let body = sample_body(3, 1).parameter(empty);
    let datagram = Datagram::from_body(MessageType::ServerToDevice, 1, body);

    assert_eq!(datagram.head.length, 18);
    assert_eq!(
        Datagram::decode_all(&datagram.to_bytes()).unwrap(),
        vec![datagram]
    );
}

#[test]
fn escape_round_trip() {
    let data: Vec<u8> = (0..=u8::MAX).rev().chain(0..=u8::MAX).collect();
    assert_eq!(unescape(&escape(&data)), data);
}

#[test]
fn unnamed_spelling_of_named_code_round_trips() {
    let body = MessageBody::for_device(4)
        .parameter(Parameter::from_byte(ParameterType::Other(0x0001), 5));
    let datagram = Datagram::from_body(MessageType::ServerToDevice, 1, body);

    let decoded = Datagram::decode_all(&datagram.to_bytes()).unwrap();
    assert_eq!(decoded, vec![datagram]);
    assert_eq!(
        decoded[0].body.parameters[0].parameter_type,
        ParameterType::PowerSwitch
    );
}

#[test]
fn short_frame_with_unknown_type_is_unsupported() {
    let mut raw = vec![0x02u8, 0x7F, 0x00, 0x00, 0x00, 0x00, 0x03];
    raw.extend([0xEEu8; 24]);

    let err = Datagram::decode_all(&raw).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::UnsupportedType { value: 0x7F });
}
