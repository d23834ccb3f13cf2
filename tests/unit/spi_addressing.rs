//! Unit tests for the SPI read/write address bit convention

use crate::common::{MockBus, Operation, config, i2c_register, spi_register};
use bus_register::{AddressWidth, ByteOrder, SpiRegisterType};

#[test]
fn test_read_bit_example() {
    let bus = MockBus::with_spi_read_bit(1);
    let cfg = config(1, ByteOrder::LsbFirst).with_spi_type(SpiRegisterType::AddrBit8HighToRead);
    let mut reg = spi_register(&bus, 0x6B, cfg);

    reg.write(0x42).unwrap();
    reg.read().unwrap();

    assert_eq!(
        bus.operations(),
        vec![
            Operation::Write {
                device: None,
                bytes: vec![0x6B, 0x42],
            },
            Operation::WriteRead {
                device: None,
                prefix: vec![0xEB],
                read: vec![0x42],
            },
        ]
    );
}

#[test]
fn test_read_bit_for_every_address_class() {
    let cfg = config(1, ByteOrder::LsbFirst).with_spi_type(SpiRegisterType::AddrBit8HighToRead);

    for address in [0x00, 0x01, 0x6B, 0x7F, 0x80, 0xC5, 0xFF] {
        let bus = MockBus::new(1);
        let mut reg = spi_register(&bus, address, cfg);

        reg.write(0x00).unwrap();
        let write = bus.last_write().unwrap();
        assert_eq!(write[0] & 0x80, 0, "write to {:#04x} must clear bit 7", address);
        assert_eq!(write[0] & 0x7F, (address & 0x7F) as u8);

        reg.read().unwrap();
        let prefix = bus.last_read_prefix().unwrap();
        assert_eq!(prefix[0] & 0x80, 0x80, "read of {:#04x} must set bit 7", address);
        assert_eq!(prefix[0] & 0x7F, (address & 0x7F) as u8);
    }
}

#[test]
fn test_read_bit_applies_to_raw_and_fixed_width_reads() {
    let bus = MockBus::with_spi_read_bit(1);
    bus.set_memory(0x0F, &[0x68, 0x01]);
    let cfg = config(1, ByteOrder::MsbFirst).with_spi_type(SpiRegisterType::AddrBit8HighToRead);
    let mut reg = spi_register(&bus, 0x0F, cfg);

    assert_eq!(reg.read_u8().unwrap(), 0x68);
    assert_eq!(bus.last_read_prefix(), Some(vec![0x8F]));

    assert_eq!(reg.read_u16().unwrap(), 0x6801);
    assert_eq!(bus.last_read_prefix(), Some(vec![0x8F]));

    let mut buffer = [0u8; 2];
    reg.read_buffer(&mut buffer).unwrap();
    assert_eq!(bus.last_read_prefix(), Some(vec![0x8F]));

    reg.write_buffer(&[0x01, 0x02]).unwrap();
    assert_eq!(bus.last_write(), Some(vec![0x0F, 0x01, 0x02]));
}

#[test]
fn test_read_bit_only_touches_first_address_byte() {
    let bus = MockBus::with_spi_read_bit(2);
    let cfg = config(1, ByteOrder::LsbFirst)
        .with_address_width(AddressWidth::Two)
        .with_spi_type(SpiRegisterType::AddrBit8HighToRead);
    let mut reg = spi_register(&bus, 0x8001, cfg);

    reg.write(0x55).unwrap();
    assert_eq!(bus.last_write(), Some(vec![0x01, 0x80, 0x55]));

    assert_eq!(reg.read().unwrap(), 0x55);
    assert_eq!(bus.last_read_prefix(), Some(vec![0x81, 0x80]));
}

#[test]
fn test_normal_spi_leaves_address_unchanged() {
    let bus = MockBus::new(1);
    let mut reg = spi_register(&bus, 0xEB, config(1, ByteOrder::LsbFirst));

    reg.write(0x01).unwrap();
    assert_eq!(bus.last_write(), Some(vec![0xEB, 0x01]));

    reg.read().unwrap();
    assert_eq!(bus.last_read_prefix(), Some(vec![0xEB]));
}

#[test]
fn test_i2c_ignores_spi_register_type() {
    let bus = MockBus::new(1);
    let cfg = config(1, ByteOrder::LsbFirst).with_spi_type(SpiRegisterType::AddrBit8HighToRead);
    let mut reg = i2c_register(&bus, 0x6B, cfg);

    reg.write(0x01).unwrap();
    assert_eq!(bus.last_write(), Some(vec![0x6B, 0x01]));

    reg.read().unwrap();
    assert_eq!(bus.last_read_prefix(), Some(vec![0x6B]));
}
