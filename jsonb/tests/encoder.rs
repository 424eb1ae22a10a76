/***************************************************************************************************
 * Copyright (c) 2024, Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * Test cases for the formatter: byte-exact payloads and frames
 **************************************************************************************************/

extern crate jsonb;

use jsonb::encoder::Formatter;
use jsonb::error::JsonbError;

#[test]
fn empty_object_payload_and_frame() -> Result<(), JsonbError> {
    println!("<======================= empty_object_payload_and_frame =====================>");
    let mut buf = [0u8; 32];
    let mut fmt = Formatter::new(&mut buf[..]);
    fmt.add_object_begin().add_object_end();
    assert_eq!(fmt.bytes(), &[0x10, 0x11]);

    let len = fmt.format_end()?;
    // COBS body of 10 11 under forbidden byte 0x0A: code 03 and both data bytes, XORed by 0x0A
    assert_eq!(
        fmt.frame()?,
        &[0x7B, 0x3A, 0x09, 0x1A, 0x1B, 0x3A, 0x7D, 0x0A]
    );
    assert_eq!(len, 8);
    Ok(())
}

#[test]
fn empty_object_frames_in_exactly_sized_buffer() -> Result<(), JsonbError> {
    println!("<============== empty_object_frames_in_exactly_sized_buffer ============>");
    // Worst-case expansion of a 2-byte payload plus signatures needs 9 bytes
    let mut buf = [0u8; 9];
    let mut fmt = Formatter::new(&mut buf[..]);
    fmt.add_object_begin().add_object_end();
    assert_eq!(fmt.format_end()?, 8);
    Ok(())
}

#[test]
fn single_string_item_payload() {
    println!("<======================= single_string_item_payload =====================>");
    let mut buf = [0u8; 64];
    let mut fmt = Formatter::new(&mut buf[..]);
    fmt.add_object_begin();
    fmt.add_string_to_object("name", "hi");
    fmt.add_object_end();
    assert_eq!(
        fmt.bytes(),
        &[
            0x10, // begin object
            0x30, b'n', b'a', b'm', b'e', 0x00, // item "name"
            0x40, b'h', b'i', 0x00, // string "hi"
            0x11, // end object
        ]
    );
}

#[test]
fn uint16_item_payload() {
    println!("<======================= uint16_item_payload =====================>");
    let mut buf = [0u8; 32];
    let mut fmt = Formatter::new(&mut buf[..]);
    fmt.add_object_begin();
    fmt.add_uint16_to_object("n", 0x0102);
    fmt.add_object_end();
    assert_eq!(
        fmt.bytes(),
        &[0x10, 0x30, 0x6E, 0x00, 0x72, 0x02, 0x01, 0x11]
    );
}

macro_rules! check_payload {
    ($expect:expr, $($append:tt)*) => {{
        let mut buf = [0u8; 32];
        let mut fmt = Formatter::new(&mut buf[..]);
        fmt.$($append)*;
        let expect: &[u8] = $expect;
        assert_eq!(fmt.bytes(), expect);
    }};
}

#[test]
fn scalar_encodings_are_little_endian() {
    println!("<======================= scalar_encodings_are_little_endian =====================>");
    check_payload!(&[0x61, 0xFE], add_int8(-2));
    check_payload!(&[0x62, 0xFE, 0xFF], add_int16(-2));
    check_payload!(&[0x64, 0x04, 0x03, 0x02, 0x01], add_int32(0x01020304));
    check_payload!(
        &[0x68, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        add_int64(-1)
    );
    check_payload!(&[0x71, 0xFE], add_uint8(0xFE));
    check_payload!(&[0x72, 0xEF, 0xBE], add_uint16(0xBEEF));
    check_payload!(&[0x74, 0xEF, 0xBE, 0xAD, 0xDE], add_uint32(0xDEADBEEF));
    check_payload!(
        &[0x78, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08],
        add_uint64(0x0807060504030201)
    );
    check_payload!(&[0x84, 0x00, 0x00, 0xC0, 0x3F], add_float(1.5));
    check_payload!(
        &[0x88, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0xC0],
        add_double(-2.25)
    );
    check_payload!(&[0x20], add_null());
    check_payload!(&[0x21], add_bool(true));
    check_payload!(&[0x22], add_bool(false));
    check_payload!(&[0x21], add_true());
    check_payload!(&[0x22], add_false());
    check_payload!(&[0x12, 0x13], add_array_begin().add_array_end());
    check_payload!(&[0x40, 0x00], add_string(""));
}

#[test]
fn binary_payloads_use_narrowest_length_prefix() {
    println!("<================ binary_payloads_use_narrowest_length_prefix ==============>");
    for (len, prefix) in [
        (0usize, vec![0x51u8, 0x00]),
        (1, vec![0x51, 0x01]),
        (255, vec![0x51, 0xFF]),
        (256, vec![0x52, 0x00, 0x01]),
        (300, vec![0x52, 0x2C, 0x01]),
        (65535, vec![0x52, 0xFF, 0xFF]),
        (65536, vec![0x53, 0x00, 0x00, 0x01]),
    ] {
        let bin = vec![0xAAu8; len];
        let mut fmt = Formatter::new(Vec::new());
        fmt.add_bin(&bin);
        let bytes = fmt.bytes();
        assert_eq!(&bytes[..prefix.len()], prefix.as_slice());
        assert_eq!(&bytes[prefix.len()..], bin.as_slice());
    }
}

#[test]
fn generic_append_picks_natural_opcodes() {
    println!("<======================= generic_append_picks_natural_opcodes =====================>");
    let mut buf = [0u8; 64];
    let mut fmt = Formatter::new(&mut buf[..]);
    fmt.add_object_begin();
    fmt.add_to_object("b", &true)
        .add_to_object("n", &0x0102u16)
        .add_to_object("s", "hi");
    fmt.add_object_end();

    let mut buf2 = [0u8; 64];
    let mut explicit = Formatter::new(&mut buf2[..]);
    explicit.add_object_begin();
    explicit.add_true_to_object("b");
    explicit.add_uint16_to_object("n", 0x0102);
    explicit.add_string_to_object("s", "hi");
    explicit.add_object_end();

    assert_eq!(fmt.bytes(), explicit.bytes());
}

#[test]
fn overrun_is_sticky_and_emits_no_frame() {
    println!("<======================= overrun_is_sticky_and_emits_no_frame =====================>");
    let big = "x".repeat(100);
    let mut buf = [0u8; 16];
    let mut fmt = Formatter::new(&mut buf[..]);
    fmt.add_object_begin();
    assert!(!fmt.overrun());
    fmt.add_string_to_object("body", &big);
    assert!(fmt.overrun());

    // Subsequent appends are no-ops
    let used = fmt.len();
    fmt.add_object_end();
    fmt.add_uint32(7);
    assert_eq!(fmt.len(), used);

    assert!(matches!(fmt.format_end(), Err(JsonbError::Overrun)));
    assert!(matches!(fmt.frame(), Err(JsonbError::NotFramed)));
}

#[test]
fn frame_end_declines_when_expansion_cannot_fit() {
    println!("<================= frame_end_declines_when_expansion_cannot_fit ===============>");
    // The 2-byte payload fits the buffer, but its worst-case encoding plus signatures does not
    let mut buf = [0u8; 8];
    let mut fmt = Formatter::new(&mut buf[..]);
    fmt.add_object_begin().add_object_end();
    assert!(matches!(fmt.format_end(), Err(JsonbError::Overrun)));
    assert!(fmt.overrun());
}

#[test]
fn growable_buffer_starts_empty_and_expands() -> Result<(), JsonbError> {
    println!("<======================= growable_buffer_starts_empty_and_expands =====================>");
    let body = "y".repeat(1000);
    let mut fmt = Formatter::new(Vec::new());
    fmt.add_object_begin();
    fmt.add_string_to_object("body", &body);
    fmt.add_uint32_to_object("len", 1000);
    fmt.add_object_end();
    assert!(!fmt.overrun());

    let len = fmt.format_end()?;
    let frame = fmt.frame()?;
    assert_eq!(frame.len(), len);
    assert!(frame.starts_with(b"{:"));
    assert!(frame.ends_with(b":}\n"));
    // The terminator appears exactly once, at the very end
    assert_eq!(frame.iter().filter(|&&b| b == b'\n').count(), 1);
    Ok(())
}

#[test]
fn format_end_is_idempotent() -> Result<(), JsonbError> {
    println!("<======================= format_end_is_idempotent =====================>");
    let mut buf = [0u8; 32];
    let mut fmt = Formatter::new(&mut buf[..]);
    fmt.add_object_begin().add_object_end();
    let len = fmt.format_end()?;
    assert_eq!(fmt.format_end()?, len);
    Ok(())
}
