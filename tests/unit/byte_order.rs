//! Unit tests for byte order handling on reads and writes

use crate::common::{MockBus, config, i2c_register};
use bus_register::ByteOrder;

#[test]
fn test_read_msb_first() {
    let bus = MockBus::new(1);
    bus.set_memory(0x20, &[0x12, 0x34]);
    let mut reg = i2c_register(&bus, 0x20, config(2, ByteOrder::MsbFirst));

    assert_eq!(reg.read().unwrap(), 0x1234);
}

#[test]
fn test_read_lsb_first() {
    let bus = MockBus::new(1);
    bus.set_memory(0x20, &[0x12, 0x34]);
    let mut reg = i2c_register(&bus, 0x20, config(2, ByteOrder::LsbFirst));

    assert_eq!(reg.read().unwrap(), 0x3412);
}

#[test]
fn test_read_three_and_four_byte_values() {
    let bus = MockBus::new(1);
    bus.set_memory(0x00, &[0xAA, 0xBB, 0xCC, 0xDD]);

    let mut reg = i2c_register(&bus, 0x00, config(3, ByteOrder::MsbFirst));
    assert_eq!(reg.read().unwrap(), 0x00AA_BBCC);

    let mut reg = i2c_register(&bus, 0x00, config(3, ByteOrder::LsbFirst));
    assert_eq!(reg.read().unwrap(), 0x00CC_BBAA);

    let mut reg = i2c_register(&bus, 0x00, config(4, ByteOrder::MsbFirst));
    assert_eq!(reg.read().unwrap(), 0xAABB_CCDD);

    let mut reg = i2c_register(&bus, 0x00, config(4, ByteOrder::LsbFirst));
    assert_eq!(reg.read().unwrap(), 0xDDCC_BBAA);
}

#[test]
fn test_write_then_read_returns_value() {
    let values = [0x0000_0000, 0x0000_0001, 0x0000_00A5, 0x0000_BEEF, 0x00C0_FFEE, 0xDEAD_BEEF];

    for width in 1..=4u8 {
        let limit = if width == 4 {
            u32::MAX
        } else {
            (1u32 << (8 * u32::from(width))) - 1
        };
        for order in [ByteOrder::LsbFirst, ByteOrder::MsbFirst] {
            let bus = MockBus::new(1);
            let mut reg = i2c_register(&bus, 0x30, config(width, order));
            for value in values {
                let value = value & limit;
                reg.write(value).unwrap();
                assert_eq!(
                    reg.read().unwrap(),
                    value,
                    "width {} order {:?}",
                    width,
                    order
                );
            }
        }
    }
}

#[test]
fn test_opposite_orders_see_reversed_bytes() {
    let bus = MockBus::new(1);
    let mut writer = i2c_register(&bus, 0x10, config(4, ByteOrder::MsbFirst));
    writer.write(0x0102_0304).unwrap();

    assert_eq!(bus.memory(0x10, 4), vec![0x01, 0x02, 0x03, 0x04]);

    let mut reader = i2c_register(&bus, 0x10, config(4, ByteOrder::LsbFirst));
    assert_eq!(reader.read().unwrap(), 0x0403_0201);
}

#[test]
fn test_read_u16_ignores_register_width() {
    let bus = MockBus::new(1);
    bus.set_memory(0x50, &[0xAB, 0xCD, 0xEF]);

    let mut reg = i2c_register(&bus, 0x50, config(1, ByteOrder::MsbFirst));
    assert_eq!(reg.read_u16().unwrap(), 0xABCD);

    let mut reg = i2c_register(&bus, 0x50, config(4, ByteOrder::LsbFirst));
    assert_eq!(reg.read_u16().unwrap(), 0xCDAB);
}

#[test]
fn test_read_u8_returns_first_byte() {
    let bus = MockBus::new(1);
    bus.set_memory(0x50, &[0xAB, 0xCD, 0xEF, 0x01]);

    let mut reg = i2c_register(&bus, 0x50, config(4, ByteOrder::LsbFirst));
    assert_eq!(reg.read_u8().unwrap(), 0xAB);

    let mut reg = i2c_register(&bus, 0x50, config(4, ByteOrder::MsbFirst));
    assert_eq!(reg.read_u8().unwrap(), 0xAB);
}
