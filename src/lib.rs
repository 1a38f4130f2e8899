#![cfg_attr(not(test), no_std)]


pub use rtcc::{
  DateTimeAccess, NaiveDate, NaiveDateTime, Datelike, Timelike,
};


use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::OutputPin;

// Command/register addresses.
//
// The address space starts at 0x80 because the highest bit of every command
// byte is always '1'. The lowest bit selects the transfer direction
// (1 = read, 0 = write); the driver forces it, callers never set it.

// Holds the current seconds, in two binary coded decimal (BCD) digits,
// plus the Clock Halt flag CH in bit 7. Values range from 00 to 59.
pub const REG_SECONDS: u8 = 0x80;

// Holds the current minutes, in two BCD digits. Values range from 00 to 59.
pub const REG_MINUTES: u8 = 0x82;

// Holds the current hour. Bit 7 selects the hour format:
// - 0: 24-hour format, two BCD digits in bits 0..=5 (00 to 23)
// - 1: 12-hour format, BCD digits in bits 0..=4 (01 to 12),
//   with bit 5 indicating AM (0) or PM (1)
pub const REG_HOURS: u8 = 0x84;

// Holds the current day of the month, in two BCD digits.
// Values range from 01 to 31; leap years are handled from 2000 to 2099.
pub const REG_DATE: u8 = 0x86;

// Holds the current month, in two BCD digits. Values range from 01 to 12.
pub const REG_MONTH: u8 = 0x88;

// Holds the current day of the week.
// A 3-bit counter with values from 1 to 7; which day is "1" is up to the user.
pub const REG_WEEKDAY: u8 = 0x8A;

// Holds the year within the century, in two BCD digits (00 for 2000).
pub const REG_YEAR: u8 = 0x8C;

// Control register. Only bit 7 is defined: the Write Protect flag WP.
// While WP is set the chip ignores writes to every other register.
// Bits 0..=6 read as 0 and must be written as 0.
pub const REG_CONTROL: u8 = 0x8E;

// Trickle charger configuration register.
// The upper nibble must be the pattern 1010b to enable the charger;
// any other pattern disables it.
pub const REG_TRICKLE: u8 = 0x90;

// Command for the 8-byte clock burst: one transaction transfers the eight
// clock/calendar registers (seconds through control) without re-addressing.
pub const CMD_CLOCK_BURST: u8 = 0xBE;

// 31 bytes of battery-backed RAM, addressed 2 apart.
pub const RAM_START: u8 = 0xC0;
pub const RAM_END: u8 = 0xFC;
pub const RAM_SIZE: u8 = 31;

// Command for the RAM burst: one transaction over the whole RAM region.
pub const CMD_RAM_BURST: u8 = 0xFE;

// Lowest bit of every command byte: 1 selects a read transfer.
pub const READ_BIT: u8 = 0x01;

/// Length in bytes of the clock burst record.
pub const CLOCK_BURST_LEN: usize = 8;

// REG_SECONDS bit: Clock Halt flag. Set stops the oscillator.
const CLOCK_HALT_BIT: u8 = 1 << 7;

// REG_CONTROL bit: Write Protect flag.
const WRITE_PROTECT_BIT: u8 = 1 << 7;

// REG_HOURS bits: hour format discriminant and AM/PM flag (12-hour only).
const HOUR_12_24_BIT: u8 = 1 << 7;
const HOUR_PM_BIT: u8 = 1 << 5;

// Any trickle register value whose select nibble is not 1010b turns the
// charger off; all-zero is the conventional choice.
const TRICKLE_CHARGER_OFF: u8 = 0x00;

// AC timing from the datasheet at 2V supply, rounded up to whole
// microseconds. The 5V figures are smaller, so these hold for both.
const CE_SETUP_US: u8 = 4; // tCC, CE high to first clock edge
const CE_INACTIVE_US: u8 = 4; // tCWH, CE low before the next transaction
const DATA_SETUP_US: u8 = 1; // tDC, data valid before the rising edge
const CLOCK_HIGH_US: u8 = 1; // tCH
const CLOCK_LOW_US: u8 = 1; // tCL

/// Driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
  /// A line handle reported an error.
  Line(E),
  /// Command byte outside the register, RAM and burst-command ranges.
  /// Rejected before any line activity.
  InvalidAddress,
}

/// The DS1302 I/O pin is half duplex: within a single read transaction it
/// switches from host-driven to chip-driven. `embedded-hal` 0.2 has no pin
/// trait with runtime direction changes, so the driver asks for this minimal
/// interface; implement it with whatever GPIO reconfiguration mechanism the
/// platform provides.
pub trait IoPin {
  /// Error type
  type Error;

  /// Configure the pin as a host-driven output.
  fn set_output(&mut self) -> Result<(), Self::Error>;

  /// Configure the pin as a high-impedance input, handing the line
  /// over to the chip.
  fn set_input(&mut self) -> Result<(), Self::Error>;

  /// Drive the line high. Only meaningful while configured as output.
  fn set_high(&mut self) -> Result<(), Self::Error>;

  /// Drive the line low. Only meaningful while configured as output.
  fn set_low(&mut self) -> Result<(), Self::Error>;

  /// Sample the line level. Only meaningful while configured as input.
  fn is_high(&mut self) -> Result<bool, Self::Error>;
}

/// Hour-of-day value of the hours register.
/// The chip stores either a 24-hour value or a 12-hour value with an AM/PM
/// flag; one bit of the register selects which interpretation is in effect,
/// so only one variant is ever valid for a given raw byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hours {
  /// 24-hour format, 0..=23
  Hour24(u8),
  /// 12-hour format before noon, 1..=12
  Hour12am(u8),
  /// 12-hour format after noon, 1..=12
  Hour12pm(u8),
}

impl Hours {
  /// The hour in 24-hour form, regardless of the stored format.
  pub fn as_h24(&self) -> u8 {
    match *self {
      Hours::Hour24(hour) => hour,
      Hours::Hour12am(12) => 0,
      Hours::Hour12am(hour) => hour,
      Hours::Hour12pm(12) => 12,
      Hours::Hour12pm(hour) => hour + 12,
    }
  }
}

impl From<u8> for Hours {
  fn from(byte: u8) -> Self {
    if byte & HOUR_12_24_BIT != 0 {
      let hour = bcd_to_bin(byte & 0x1F);
      if byte & HOUR_PM_BIT != 0 {
        Hours::Hour12pm(hour)
      }
      else {
        Hours::Hour12am(hour)
      }
    }
    else {
      Hours::Hour24(bcd_to_bin(byte & 0x3F))
    }
  }
}

impl From<Hours> for u8 {
  fn from(hours: Hours) -> Self {
    match hours {
      Hours::Hour24(hour) => bin_to_bcd(hour),
      Hours::Hour12am(hour) => HOUR_12_24_BIT | bin_to_bcd(hour),
      Hours::Hour12pm(hour) => HOUR_12_24_BIT | HOUR_PM_BIT | bin_to_bcd(hour),
    }
  }
}

/// The raw 8-byte clock burst record: seconds, minutes, hours, date, month,
/// weekday, year, control, in transfer order.
///
/// The accessors touch only the bits the chip defines for each field and
/// leave reserved bits exactly as read, so a record obtained from
/// `clock_burst_read` can be modified and written back without disturbing
/// them. The chip does not guarantee that reserved bits read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockFrame {
  bytes: [u8; CLOCK_BURST_LEN],
}

impl ClockFrame {
  pub fn from_bytes(bytes: [u8; CLOCK_BURST_LEN]) -> Self {
    ClockFrame { bytes }
  }

  pub fn as_bytes(&self) -> &[u8; CLOCK_BURST_LEN] {
    &self.bytes
  }

  /// Seconds, 0..=59. Byte 0, BCD in bits 0..=6.
  pub fn seconds(&self) -> u8 {
    bcd_to_bin(self.bytes[0] & 0x7F)
  }

  pub fn set_seconds(&mut self, seconds: u8) {
    self.bytes[0] = (self.bytes[0] & CLOCK_HALT_BIT) | bin_to_bcd(seconds);
  }

  /// Clock Halt flag. Byte 0, bit 7.
  pub fn clock_halted(&self) -> bool {
    self.bytes[0] & CLOCK_HALT_BIT != 0
  }

  pub fn set_clock_halt(&mut self, halt: bool) {
    if halt {
      self.bytes[0] |= CLOCK_HALT_BIT;
    }
    else {
      self.bytes[0] &= !CLOCK_HALT_BIT;
    }
  }

  /// Minutes, 0..=59. Byte 1, BCD in bits 0..=6.
  pub fn minutes(&self) -> u8 {
    bcd_to_bin(self.bytes[1] & 0x7F)
  }

  pub fn set_minutes(&mut self, minutes: u8) {
    self.bytes[1] = (self.bytes[1] & 0x80) | bin_to_bcd(minutes);
  }

  /// Hour of day. Byte 2: format flag in bit 7, AM/PM in bit 5 (12-hour),
  /// BCD hour in the remaining low bits.
  pub fn hours(&self) -> Hours {
    self.bytes[2].into()
  }

  pub fn set_hours(&mut self, hours: Hours) {
    self.bytes[2] = (self.bytes[2] & 0x40) | u8::from(hours);
  }

  /// Day of month, 1..=31. Byte 3, BCD in bits 0..=5.
  pub fn date(&self) -> u8 {
    bcd_to_bin(self.bytes[3] & 0x3F)
  }

  pub fn set_date(&mut self, date: u8) {
    self.bytes[3] = (self.bytes[3] & 0xC0) | bin_to_bcd(date);
  }

  /// Month, 1..=12. Byte 4, BCD in bits 0..=4.
  pub fn month(&self) -> u8 {
    bcd_to_bin(self.bytes[4] & 0x1F)
  }

  pub fn set_month(&mut self, month: u8) {
    self.bytes[4] = (self.bytes[4] & 0xE0) | bin_to_bcd(month);
  }

  /// Day of week, 1..=7, any day may be "1". Byte 5, bits 0..=2.
  pub fn weekday(&self) -> u8 {
    self.bytes[5] & 0x07
  }

  pub fn set_weekday(&mut self, weekday: u8) {
    self.bytes[5] = (self.bytes[5] & 0xF8) | (weekday & 0x07);
  }

  /// Year within the century, 0..=99. Byte 6, two BCD digits.
  pub fn year(&self) -> u8 {
    bcd_to_bin(self.bytes[6])
  }

  pub fn set_year(&mut self, year: u8) {
    self.bytes[6] = bin_to_bcd(year);
  }

  /// Write Protect flag. Byte 7, bit 7.
  pub fn write_protected(&self) -> bool {
    self.bytes[7] & WRITE_PROTECT_BIT != 0
  }

  pub fn set_write_protect(&mut self, protect: bool) {
    if protect {
      self.bytes[7] |= WRITE_PROTECT_BIT;
    }
    else {
      self.bytes[7] &= !WRITE_PROTECT_BIT;
    }
  }
}

// Converts a binary value to BCD format
fn bin_to_bcd(value: u8) -> u8 {
  ((value / 10) << 4) | (value % 10)
}

// Converts a BCD value to binary format
fn bcd_to_bin(value: u8) -> u8 {
  ((value & 0xF0) >> 4) * 10 + (value & 0x0F)
}

// Every command byte must land in one of the documented ranges before it may
// be put on the wire; anything else reaches undefined chip behavior. The
// read bit is masked off first, so either polarity of a valid address passes.
fn check_command<E>(address: u8) -> Result<(), Error<E>> {
  match address & !READ_BIT {
    REG_SECONDS..=REG_TRICKLE => Ok(()),
    CMD_CLOCK_BURST => Ok(()),
    RAM_START..=RAM_END => Ok(()),
    CMD_RAM_BURST => Ok(()),
    _ => Err(Error::InvalidAddress),
  }
}

fn ram_address<E>(index: u8) -> Result<u8, Error<E>> {
  if index >= RAM_SIZE {
    return Err(Error::InvalidAddress);
  }
  Ok(RAM_START + 2 * index)
}

/// DS1302
/// Trickle-Charge Timekeeping Chip with a three-wire serial interface
/// (clock, chip enable, and a half-duplex data line), driven here entirely
/// in software through the embedded_hal digital pin and delay interfaces.
///
/// The driver owns its three line handles exclusively. It keeps no state
/// between calls; the chip holds the clock and calendar. It performs no
/// internal locking: callers sharing one instance must serialize access,
/// and no operation may be abandoned between its start and its end.
pub struct Ds1302<CLK, IO, CE, D> {
  sclk: CLK,
  io: IO,
  ce: CE,
  delay: D,
}

impl<CLK, IO, CE, D, E> Ds1302<CLK, IO, CE, D>
  where
    CLK: OutputPin<Error = E>,
    IO: IoPin<Error = E>,
    CE: OutputPin<Error = E>,
    D: DelayUs<u8>,
{

  /// New driver instance. Drives the clock and chip-enable lines to their
  /// idle (low) levels and touches nothing else: the chip's write-protect
  /// and trickle-charge configuration are left as found.
  pub fn new(sclk: CLK, io: IO, ce: CE, delay: D) -> Result<Self, Error<E>> {
    let mut ds1302 = Ds1302 { sclk, io, ce, delay };
    ds1302.sclk.set_low().map_err(Error::Line)?;
    ds1302.ce.set_low().map_err(Error::Line)?;
    Ok(ds1302)
  }

  /// New driver instance that additionally clears the write-protect flag
  /// and disables the trickle charger, for callers that want a chip that is
  /// ready to accept writes straight away.
  pub fn new_unlocked(sclk: CLK, io: IO, ce: CE, delay: D) -> Result<Self, Error<E>> {
    let mut ds1302 = Self::new(sclk, io, ce, delay)?;
    ds1302.toggle_write_protect(false)?;
    ds1302.disable_trickle_charge()?;
    Ok(ds1302)
  }

  /// Release the line handles and the delay provider.
  pub fn destroy(self) -> (CLK, IO, CE, D) {
    (self.sclk, self.io, self.ce, self.delay)
  }

  // Open a transaction: claim the data line, raise CE, and give the chip
  // its CE-to-clock setup time before the first edge.
  fn start(&mut self) -> Result<(), Error<E>> {
    self.io.set_output().map_err(Error::Line)?;
    self.ce.set_high().map_err(Error::Line)?;
    self.delay.delay_us(CE_SETUP_US);
    Ok(())
  }

  // Close a transaction and honor the CE inactive time before the lines
  // may be used again.
  fn stop(&mut self) -> Result<(), Error<E>> {
    self.ce.set_low().map_err(Error::Line)?;
    self.delay.delay_us(CE_INACTIVE_US);
    Ok(())
  }

  // Clock one byte out, least significant bit first. The chip samples the
  // data line on each rising clock edge.
  //
  // `release` must be true when a read phase follows. The line is then
  // handed over to the chip after the last rising edge, while the clock is
  // still high: releasing it only after the clock fell would leave an
  // interval where both ends drive the line.
  fn write_byte(&mut self, byte: u8, release: bool) -> Result<(), Error<E>> {
    for i in 0..8 {
      if (byte >> i) & 0x01 != 0 {
        self.io.set_high().map_err(Error::Line)?;
      }
      else {
        self.io.set_low().map_err(Error::Line)?;
      }
      self.delay.delay_us(DATA_SETUP_US);

      self.sclk.set_high().map_err(Error::Line)?;
      self.delay.delay_us(CLOCK_HIGH_US);

      if release && i == 7 {
        self.io.set_input().map_err(Error::Line)?;
      }
      else {
        self.sclk.set_low().map_err(Error::Line)?;
        self.delay.delay_us(CLOCK_LOW_US);
      }
    }
    Ok(())
  }

  // Clock one byte in, least significant bit first. Expects the clock to
  // have been left high by a preceding `write_byte` with `release` set.
  // The chip presents each bit on the falling edge, so the line is sampled
  // while the clock is low.
  fn read_byte(&mut self) -> Result<u8, Error<E>> {
    let mut byte = 0u8;
    for i in 0..8 {
      self.sclk.set_high().map_err(Error::Line)?;
      self.delay.delay_us(CLOCK_HIGH_US);

      self.sclk.set_low().map_err(Error::Line)?;
      self.delay.delay_us(CLOCK_LOW_US);

      if self.io.is_high().map_err(Error::Line)? {
        byte |= 1 << i;
      }
    }
    Ok(byte)
  }

  /// Read a single register. The read bit of `address` is forced on,
  /// whatever the caller passed.
  pub fn read(&mut self, address: u8) -> Result<u8, Error<E>> {
    check_command(address)?;
    self.start()?;
    self.write_byte(address | READ_BIT, true)?;
    let byte = self.read_byte()?;
    self.stop()?;
    Ok(byte)
  }

  /// Write a single register. The read bit of `address` is forced off,
  /// whatever the caller passed.
  ///
  /// While the chip's write-protect flag is set it ignores the write
  /// without any indication on the wire; see `is_write_protected`.
  pub fn write(&mut self, address: u8, byte: u8) -> Result<(), Error<E>> {
    check_command(address)?;
    self.start()?;
    self.write_byte(address & !READ_BIT, false)?;
    self.write_byte(byte, false)?;
    self.stop()
  }

  /// Read the eight clock/calendar registers in one burst transaction.
  /// The chip freezes its register snapshot for the duration of the burst,
  /// so the record is tear-free; eight single reads would not be.
  pub fn clock_burst_read(&mut self) -> Result<ClockFrame, Error<E>> {
    let mut bytes = [0u8; CLOCK_BURST_LEN];
    self.start()?;
    self.write_byte(CMD_CLOCK_BURST | READ_BIT, true)?;
    for slot in bytes.iter_mut() {
      *slot = self.read_byte()?;
    }
    self.stop()?;
    Ok(ClockFrame::from_bytes(bytes))
  }

  /// Write the eight clock/calendar registers in one burst transaction.
  pub fn clock_burst_write(&mut self, frame: &ClockFrame) -> Result<(), Error<E>> {
    self.start()?;
    self.write_byte(CMD_CLOCK_BURST, false)?;
    for &byte in frame.as_bytes() {
      self.write_byte(byte, false)?;
    }
    self.stop()
  }

  /// Read one of the 31 RAM bytes. `index` counts from 0.
  pub fn read_ram(&mut self, index: u8) -> Result<u8, Error<E>> {
    self.read(ram_address(index)?)
  }

  /// Write one of the 31 RAM bytes. `index` counts from 0.
  pub fn write_ram(&mut self, index: u8, byte: u8) -> Result<(), Error<E>> {
    self.write(ram_address(index)?, byte)
  }

  /// Fill `buf` from the start of RAM in one burst transaction.
  /// At most `RAM_SIZE` bytes; longer buffers are rejected.
  pub fn ram_burst_read(&mut self, buf: &mut [u8]) -> Result<(), Error<E>> {
    if buf.len() > RAM_SIZE as usize {
      return Err(Error::InvalidAddress);
    }
    self.start()?;
    self.write_byte(CMD_RAM_BURST | READ_BIT, true)?;
    for slot in buf.iter_mut() {
      *slot = self.read_byte()?;
    }
    self.stop()
  }

  /// Write `data` to the start of RAM in one burst transaction.
  /// At most `RAM_SIZE` bytes; longer slices are rejected.
  pub fn ram_burst_write(&mut self, data: &[u8]) -> Result<(), Error<E>> {
    if data.len() > RAM_SIZE as usize {
      return Err(Error::InvalidAddress);
    }
    self.start()?;
    self.write_byte(CMD_RAM_BURST, false)?;
    for &byte in data {
      self.write_byte(byte, false)?;
    }
    self.stop()
  }

  /// Set time of day (hours, minutes, seconds) in binary format.
  /// The hours register is written in 24-hour format, and writing the
  /// seconds register clears the Clock Halt flag, starting the oscillator.
  pub fn set_time(&mut self, hours: u8, minutes: u8, seconds: u8) -> Result<(), Error<E>> {
    self.write(REG_HOURS, Hours::Hour24(hours).into())?;
    self.write(REG_MINUTES, bin_to_bcd(minutes))?;
    self.write(REG_SECONDS, bin_to_bcd(seconds))
  }

  /// Get time of day in binary format (hours, minutes, seconds).
  /// Hours are returned in 24-hour form whichever format the chip is in.
  pub fn get_time(&mut self) -> Result<(u8, u8, u8), Error<E>> {
    let hours = Hours::from(self.read(REG_HOURS)?).as_h24();
    let minutes = bcd_to_bin(self.read(REG_MINUTES)? & 0x7F);
    let seconds = bcd_to_bin(self.read(REG_SECONDS)? & 0x7F);
    Ok((hours, minutes, seconds))
  }

  /// Set the weekday (day of week, 1..=7)
  pub fn set_weekday(&mut self, weekday: u8) -> Result<(), Error<E>> {
    self.write(REG_WEEKDAY, weekday & 0x07)
  }

  /// Get the weekday (day of week, 1..=7)
  pub fn get_weekday(&mut self) -> Result<u8, Error<E>> {
    Ok(self.read(REG_WEEKDAY)? & 0x07)
  }

  /// Set the calendar date (day number of month) (1..=31)
  pub fn set_date(&mut self, date: u8) -> Result<(), Error<E>> {
    self.write(REG_DATE, bin_to_bcd(date))
  }

  /// Get the calendar date (day number of month) (1..=31)
  pub fn get_date(&mut self) -> Result<u8, Error<E>> {
    let bcd = self.read(REG_DATE)?;
    Ok(bcd_to_bin(bcd & 0x3F))
  }

  /// Set the calendar month (1..=12)
  pub fn set_month(&mut self, month: u8) -> Result<(), Error<E>> {
    self.write(REG_MONTH, bin_to_bcd(month))
  }

  /// Get the calendar month (1..=12)
  pub fn get_month(&mut self) -> Result<u8, Error<E>> {
    let bcd = self.read(REG_MONTH)?;
    Ok(bcd_to_bin(bcd & 0x1F))
  }

  /// Set the calendar year (0..=99 for 2000..=2099)
  pub fn set_year(&mut self, year: u8) -> Result<(), Error<E>> {
    self.write(REG_YEAR, bin_to_bcd(year))
  }

  /// Get the calendar year (0..=99 for 2000..=2099)
  pub fn get_year(&mut self) -> Result<u8, Error<E>> {
    let bcd = self.read(REG_YEAR)?;
    Ok(bcd_to_bin(bcd))
  }

  /// Set the calendar year, month, day. Year is 0..=99 (for 2000 to 2099)
  pub fn set_year_month_day(&mut self, year: u8, month: u8, day: u8) -> Result<(), Error<E>> {
    self.set_year(year)?;
    self.set_month(month)?;
    self.set_date(day)
  }

  /// Get the calendar year, month, day
  pub fn get_year_month_day(&mut self) -> Result<(u8, u8, u8), Error<E>> {
    let year = self.get_year()?;
    let month = self.get_month()?;
    let day = self.get_date()?;
    Ok((year, month, day))
  }

  /// Set or clear the write-protect flag.
  /// The remaining control register bits read 0 and must be written 0.
  pub fn toggle_write_protect(&mut self, enable: bool) -> Result<(), Error<E>> {
    self.write(REG_CONTROL, if enable { WRITE_PROTECT_BIT } else { 0x00 })
  }

  /// Whether the chip currently ignores writes. The protocol carries no
  /// acknowledgment, so a write issued while this is set is dropped
  /// silently; callers that care should check first.
  pub fn is_write_protected(&mut self) -> Result<bool, Error<E>> {
    Ok(self.read(REG_CONTROL)? & WRITE_PROTECT_BIT != 0)
  }

  /// Halt or restart the oscillator, preserving the stored seconds.
  pub fn toggle_clock_halt(&mut self, halt: bool) -> Result<(), Error<E>> {
    let seconds = self.read(REG_SECONDS)?;
    let updated = if halt {
      seconds | CLOCK_HALT_BIT
    }
    else {
      seconds & !CLOCK_HALT_BIT
    };
    self.write(REG_SECONDS, updated)
  }

  /// Whether the oscillator is halted.
  pub fn is_clock_halted(&mut self) -> Result<bool, Error<E>> {
    Ok(self.read(REG_SECONDS)? & CLOCK_HALT_BIT != 0)
  }

  /// Disable the trickle charger. Enabling it requires a diode and
  /// resistor selection and is left to a raw `write` of `REG_TRICKLE`.
  pub fn disable_trickle_charge(&mut self) -> Result<(), Error<E>> {
    self.write(REG_TRICKLE, TRICKLE_CHARGER_OFF)
  }
}

impl<CLK, IO, CE, D, E> DateTimeAccess for Ds1302<CLK, IO, CE, D>
  where
    CLK: OutputPin<Error = E>,
    IO: IoPin<Error = E>,
    CE: OutputPin<Error = E>,
    D: DelayUs<u8>,
{
  type Error = Error<E>;

  /// Reads the clock and calendar in a single burst, so the result is a
  /// consistent snapshot. The chip covers the years 2000 to 2099.
  fn datetime(&mut self) -> Result<NaiveDateTime, Self::Error> {
    let frame = self.clock_burst_read()?;
    let date = NaiveDate::from_ymd_opt(
      2000 + frame.year() as i32,
      frame.month() as u32,
      frame.date() as u32,
    ).expect("calendar registers out of range");
    Ok(date.and_hms_opt(
      frame.hours().as_h24() as u32,
      frame.minutes() as u32,
      frame.seconds() as u32,
    ).expect("clock registers out of range"))
  }

  /// Writes the clock and calendar in a single burst. The hours register is
  /// set in 24-hour format, the weekday to ISO numbering (Monday = 1), the
  /// Clock Halt flag is cleared, and the record's control byte leaves the
  /// chip unprotected. The caller is expected to stay within the chip's
  /// 2000..=2099 window.
  fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), Self::Error> {
    let year: u8 = (datetime.year() - 2000).try_into()
      .expect("year earlier than 2000");
    let mut frame = ClockFrame::default();
    frame.set_seconds(datetime.second() as u8);
    frame.set_minutes(datetime.minute() as u8);
    frame.set_hours(Hours::Hour24(datetime.hour() as u8));
    frame.set_date(datetime.day() as u8);
    frame.set_month(datetime.month() as u8);
    frame.set_weekday(datetime.weekday().number_from_monday() as u8);
    frame.set_year(year);
    self.clock_burst_write(&frame)
  }
}
