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
 * Format -> frame -> parse round trip tests
 **************************************************************************************************/

extern crate jsonb;

use jsonb::decoder::Parser;
use jsonb::encoder::Formatter;
use jsonb::error::JsonbError;
use jsonb::types::Opcode;

#[test]
fn frame_round_trip_recovers_payload() -> Result<(), JsonbError> {
    println!("<======================= frame_round_trip_recovers_payload =====================>");
    let mut fmt = Formatter::new(Vec::new());
    fmt.add_object_begin();
    fmt.add_string_to_object("req", "note.add");
    fmt.add_item_to_object("payload");
    fmt.add_array_begin();
    fmt.add_uint8(1).add_uint8(2).add_uint8(3);
    fmt.add_array_end();
    fmt.add_object_end();
    let payload = fmt.bytes().to_vec();

    let len = fmt.format_end()?;
    let mut buf = fmt.into_inner();
    let parser = Parser::parse(&mut buf[..len])?;
    assert_eq!(parser.payload(), payload.as_slice());
    Ok(())
}

#[test]
fn every_type_survives_a_round_trip() -> Result<(), JsonbError> {
    println!("<======================= every_type_survives_a_round_trip =====================>");
    let bin: Vec<u8> = (0..=255u8).collect();
    let mut fmt = Formatter::new(Vec::new());
    fmt.add_object_begin();
    fmt.add_string_to_object("s", "two\nlines");
    fmt.add_null_to_object("nothing");
    fmt.add_bool_to_object("yes", true);
    fmt.add_bool_to_object("no", false);
    fmt.add_int8_to_object("i8", i8::MIN);
    fmt.add_int16_to_object("i16", i16::MIN);
    fmt.add_int32_to_object("i32", i32::MIN);
    fmt.add_int64_to_object("i64", i64::MIN);
    fmt.add_uint8_to_object("u8", u8::MAX);
    fmt.add_uint16_to_object("u16", u16::MAX);
    fmt.add_uint32_to_object("u32", u32::MAX);
    fmt.add_uint64_to_object("u64", u64::MAX);
    fmt.add_float_to_object("f32", 0.15625);
    fmt.add_double_to_object("f64", -1.0e100);
    fmt.add_bin_to_object("bin", &bin);
    fmt.add_item_to_object("list");
    fmt.add_array_begin();
    fmt.add_string("inner").add_int32(-3).add_null();
    fmt.add_array_end();
    fmt.add_object_end();

    let len = fmt.format_end()?;
    let mut buf = fmt.into_inner();
    let mut parser = Parser::parse(&mut buf[..len])?;

    assert_eq!(parser.get_string("s"), "two\nlines");
    assert!(parser.get_bool("yes"));
    assert!(!parser.get_bool("no"));
    assert!(!parser.get_bool("nothing"));
    assert_eq!(
        parser.get_object_item("nothing").map(|(op, _)| op),
        Some(Opcode::Null)
    );
    assert_eq!(parser.get_int64("i8"), i8::MIN as i64);
    assert_eq!(parser.get_int64("i16"), i16::MIN as i64);
    assert_eq!(parser.get_int64("i32"), i32::MIN as i64);
    assert_eq!(parser.get_int64("i64"), i64::MIN);
    assert_eq!(parser.get_uint64("u8"), u8::MAX as u64);
    assert_eq!(parser.get_uint64("u16"), u16::MAX as u64);
    assert_eq!(parser.get_uint64("u32"), u32::MAX as u64);
    assert_eq!(parser.get_uint64("u64"), u64::MAX);
    assert_eq!(parser.get_float("f32"), 0.15625);
    assert_eq!(parser.get_double("f64"), -1.0e100);

    let (op, value) = parser.get_object_item("bin").unwrap();
    assert_eq!(op, Opcode::Bin16);
    assert_eq!(value, bin.as_slice());

    let (op, _) = parser.get_object_item("list").unwrap();
    assert_eq!(op, Opcode::BeginArray);
    let el = parser.next().unwrap();
    assert_eq!(el.opcode, Opcode::String);
    assert_eq!(el.value, b"inner\0");
    assert_eq!(parser.next().unwrap().opcode, Opcode::Int32);
    assert_eq!(parser.next().unwrap().opcode, Opcode::Null);
    assert_eq!(parser.next().unwrap().opcode, Opcode::EndArray);
    Ok(())
}

#[test]
fn random_numeric_items_are_preserved() -> Result<(), JsonbError> {
    println!("<======================= random_numeric_items_are_preserved =====================>");
    fastrand::seed(0x1005E);
    for _ in 0..100 {
        let i = fastrand::i64(..);
        let u = fastrand::u64(..);
        let f = f64::from_bits(fastrand::u64(..));
        let mut fmt = Formatter::new(Vec::new());
        fmt.add_object_begin();
        fmt.add_int64_to_object("i", i);
        fmt.add_uint64_to_object("u", u);
        fmt.add_double_to_object("f", f);
        fmt.add_object_end();
        let len = fmt.format_end()?;
        let mut buf = fmt.into_inner();

        let mut parser = Parser::parse(&mut buf[..len])?;
        assert_eq!(parser.get_int64("i"), i);
        assert_eq!(parser.get_uint64("u"), u);
        let back = parser.get_double("f");
        assert_eq!(back.to_bits(), f.to_bits());
    }
    Ok(())
}

#[test]
fn random_binary_frames_survive_cobs() -> Result<(), JsonbError> {
    println!("<======================= random_binary_frames_survive_cobs =====================>");
    fastrand::seed(0xB1AB);
    for _ in 0..50 {
        let len = fastrand::usize(0..4096);
        let bin: Vec<u8> = (0..len).map(|_| fastrand::u8(..)).collect();
        let mut fmt = Formatter::new(Vec::new());
        fmt.add_object_begin();
        fmt.add_bin_to_object("b", &bin);
        fmt.add_object_end();
        let frame_len = fmt.format_end()?;
        let mut buf = fmt.into_inner();

        // The terminator never appears before the end of the frame
        assert!(buf[..frame_len - 1].iter().all(|&b| b != b'\n'));
        assert_eq!(buf[frame_len - 1], b'\n');

        let mut parser = Parser::parse(&mut buf[..frame_len])?;
        let (_, value) = parser.get_object_item("b").unwrap();
        assert_eq!(value, bin.as_slice());
    }
    Ok(())
}

#[test]
fn fixed_buffer_round_trip_without_allocation() -> Result<(), JsonbError> {
    println!("<======================= fixed_buffer_round_trip_without_allocation =====================>");
    let mut buf = [0u8; 256];
    let len = {
        let mut fmt = Formatter::new(&mut buf[..]);
        fmt.add_object_begin();
        fmt.add_string_to_object("req", "hub.status");
        fmt.add_uint32_to_object("seq", 42);
        fmt.add_object_end();
        fmt.format_end()?
    };

    let mut parser = Parser::parse(&mut buf[..len])?;
    assert_eq!(parser.get_string("req"), "hub.status");
    assert_eq!(parser.get_uint32("seq"), 42);
    Ok(())
}
