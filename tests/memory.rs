use ikea_asm::{assemble, AsmError, MemoryImage};
use ikea_asm::memory::{predict_address, IMAGE_SIZE};

#[test]
fn predicted_addresses_are_eight_apart() {
    for k in 0..32usize {
        let addr = predict_address(k).unwrap();
        assert_eq!(addr.value() as usize, 8 * k);
        assert_eq!(addr.to_string(), format!("{:08b}", 8 * k));
    }
    assert!(matches!(predict_address(32), Err(AsmError::Capacity { .. })));
}

#[test]
fn every_signed_byte_round_trips_through_ram() {
    let mut src = String::from(".text\n.data\n");
    for v in -128i32..=127 {
        src.push_str(&format!("v{}:{v}\n", v + 128));
    }
    let asm = assemble(&src).unwrap();
    assert_eq!(asm.ram.used(), IMAGE_SIZE);
    for v in -128i32..=127 {
        let addr = asm.data_labels.get(&format!("v{}", v + 128)).unwrap();
        assert_eq!(asm.ram.read_u8(addr.value()) as i8 as i32, v);
    }
}

#[test]
fn data_segment_is_bounded() {
    let mut src = String::from(".text\n.data\n");
    for i in 0..257 {
        src.push_str(&format!("d{i}:0\n"));
    }
    let err = assemble(&src).unwrap_err();
    assert_eq!(err.root(), &AsmError::Capacity { at: 256, requested: 1 });
}

#[test]
fn mixed_widths_stay_contiguous() {
    let mut img = MemoryImage::new();
    img.write_u8(0x11).unwrap();
    img.write(&[0x22, 0x33, 0x44, 0x55]).unwrap();
    let at = img.write_u64(0x0102_0304_0506_0708).unwrap();
    assert_eq!(at.value(), 5);
    assert_eq!(img.read_u8(5), 0x08);
    assert_eq!(img.read_u8(12), 0x01);
    assert_eq!(img.used(), 13);
}
