extern crate ds1302_rtc;

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::thread::sleep;
use std::time::Duration;

use chrono::Utc;
use ds1302_rtc::{
  DateTimeAccess, Ds1302, IoPin, CMD_CLOCK_BURST, READ_BIT, REG_SECONDS, REG_TRICKLE,
};
use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::OutputPin;

/**
Classic DS1302 readout loop: synchronize the chip to the system clock,
then burst-read the clock registers and print the decoded fields.

The three lines are wired to an in-memory model of the chip rather than
real GPIO, so the demo runs anywhere; swap the line types for your
platform's pins to talk to actual hardware. The model does not tick, so
the printed time repeats the instant it was set.
*/

// Microsecond delay backed by a busy-wait. On a hosted target an OS sleep
// could overshoot by milliseconds, which would wreck the bit timing on
// real hardware, so the demo uses the same discipline.
struct SpinDelay;

impl DelayUs<u8> for SpinDelay {
  fn delay_us(&mut self, us: u8) {
    spin_sleep::sleep(Duration::from_micros(us.into()));
  }
}

// Register-level model of the chip: enough for the clock burst and the
// single-register configuration writes the driver issues.
struct Chip {
  regs: [u8; 9],
  sclk: bool,
  ce: bool,
  io_host: bool,
  io_output: bool,
  out_level: bool,
  cmd: u8,
  have_cmd: bool,
  shift: u8,
  nbits: u8,
  byte_index: usize,
  read_bits: usize,
}

impl Chip {
  fn new() -> Rc<RefCell<Chip>> {
    Rc::new(RefCell::new(Chip {
      regs: [0; 9],
      sclk: false,
      ce: false,
      io_host: false,
      io_output: true,
      out_level: false,
      cmd: 0,
      have_cmd: false,
      shift: 0,
      nbits: 0,
      byte_index: 0,
      read_bits: 0,
    }))
  }

  fn set_ce(&mut self, level: bool) {
    if level == self.ce {
      return;
    }
    self.ce = level;
    if level {
      self.have_cmd = false;
      self.shift = 0;
      self.nbits = 0;
      self.byte_index = 0;
      self.read_bits = 0;
    }
  }

  fn set_sclk(&mut self, level: bool) {
    if level == self.sclk {
      return;
    }
    self.sclk = level;
    if !self.ce {
      return;
    }
    let reading = self.have_cmd && self.cmd & READ_BIT != 0;
    if level {
      // rising edge: sample the host-driven level
      if !reading {
        if self.io_host {
          self.shift |= 1 << self.nbits;
        }
        self.nbits += 1;
        if self.nbits == 8 {
          if !self.have_cmd {
            self.cmd = self.shift;
            self.have_cmd = true;
          }
          else {
            self.store(self.shift);
            self.byte_index += 1;
          }
          self.shift = 0;
          self.nbits = 0;
        }
      }
    }
    else if reading {
      // falling edge: present the next output bit
      let byte = self.fetch(self.read_bits / 8);
      self.out_level = (byte >> (self.read_bits % 8)) & 0x01 != 0;
      self.read_bits += 1;
    }
  }

  fn store(&mut self, byte: u8) {
    let base = self.cmd & !READ_BIT;
    match base {
      CMD_CLOCK_BURST => {
        if self.byte_index < 8 {
          self.regs[self.byte_index] = byte;
        }
      }
      REG_SECONDS..=REG_TRICKLE if self.byte_index == 0 => {
        self.regs[((base - REG_SECONDS) / 2) as usize] = byte;
      }
      _ => {}
    }
  }

  fn fetch(&self, index: usize) -> u8 {
    let base = self.cmd & !READ_BIT;
    match base {
      CMD_CLOCK_BURST if index < 8 => self.regs[index],
      REG_SECONDS..=REG_TRICKLE if index == 0 => {
        self.regs[((base - REG_SECONDS) / 2) as usize]
      }
      _ => 0,
    }
  }
}

struct Sclk(Rc<RefCell<Chip>>);
struct Ce(Rc<RefCell<Chip>>);
struct Io(Rc<RefCell<Chip>>);

impl OutputPin for Sclk {
  type Error = Infallible;

  fn set_low(&mut self) -> Result<(), Infallible> {
    self.0.borrow_mut().set_sclk(false);
    Ok(())
  }

  fn set_high(&mut self) -> Result<(), Infallible> {
    self.0.borrow_mut().set_sclk(true);
    Ok(())
  }
}

impl OutputPin for Ce {
  type Error = Infallible;

  fn set_low(&mut self) -> Result<(), Infallible> {
    self.0.borrow_mut().set_ce(false);
    Ok(())
  }

  fn set_high(&mut self) -> Result<(), Infallible> {
    self.0.borrow_mut().set_ce(true);
    Ok(())
  }
}

impl IoPin for Io {
  type Error = Infallible;

  fn set_output(&mut self) -> Result<(), Infallible> {
    self.0.borrow_mut().io_output = true;
    Ok(())
  }

  fn set_input(&mut self) -> Result<(), Infallible> {
    self.0.borrow_mut().io_output = false;
    Ok(())
  }

  fn set_high(&mut self) -> Result<(), Infallible> {
    self.0.borrow_mut().io_host = true;
    Ok(())
  }

  fn set_low(&mut self) -> Result<(), Infallible> {
    self.0.borrow_mut().io_host = false;
    Ok(())
  }

  fn is_high(&mut self) -> Result<bool, Infallible> {
    let chip = self.0.borrow();
    Ok(if chip.io_output { chip.io_host } else { chip.out_level })
  }
}

fn main() {
  let chip = Chip::new();

  // Unlocked construction: write protection cleared, trickle charger off
  let mut rtc = Ds1302::new_unlocked(
    Sclk(chip.clone()),
    Io(chip.clone()),
    Ce(chip.clone()),
    SpinDelay,
  ).expect("line setup failed");

  // Synchronize the chip to the current system time
  rtc.set_datetime(&Utc::now().naive_utc())
    .expect("couldn't set datetime");

  for _ in 0..5 {
    let frame = rtc.clock_burst_read().expect("burst read failed");

    println!(
      "Time = {:02}:{:02}:{:02}, Date(day of month) = {}, Month = {}, \
       Day(day of week) = {}, Year = {}",
      frame.hours().as_h24(),
      frame.minutes(),
      frame.seconds(),
      frame.date(),
      frame.month(),
      frame.weekday(),
      2000 + frame.year() as u32,
    );

    sleep(Duration::from_secs(1));
  }
}
