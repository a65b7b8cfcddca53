use rand::Rng;

use crate::constants::{ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, FONT_START};
use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::state::State;

impl Instruction {
    /// Applies the Instruction to the State
    ///
    /// Every instruction leaves the program counter pointing at the next one to run, with the
    /// exception of `Fx0A` which holds it in place until a key is pressed.
    pub(crate) fn execute<R: Rng>(self, state: &mut State, rng: &mut R) -> Result<(), Chip8Error> {
        use Instruction::*;

        match self {
            Clear => clr(state),
            Return => rts(state)?,
            Jump { addr } => jump(state, addr),
            Call { addr } => call(state, addr)?,
            SkipIfEqual { x, kk } => ske(state, x, kk),
            SkipIfNotEqual { x, kk } => skne(state, x, kk),
            SkipIfRegistersEqual { x, y } => skre(state, x, y),
            Load { x, kk } => load(state, x, kk),
            Add { x, kk } => add(state, x, kk),
            Move { x, y } => mv(state, x, y),
            Or { x, y } => or(state, x, y),
            And { x, y } => and(state, x, y),
            Xor { x, y } => xor(state, x, y),
            AddRegisters { x, y } => addv(state, x, y),
            Sub { x, y } => sub(state, x, y),
            ShiftRight { x } => shr(state, x),
            SubN { x, y } => subn(state, x, y),
            ShiftLeft { x } => shl(state, x),
            SkipIfRegistersNotEqual { x, y } => skrne(state, x, y),
            LoadIndex { addr } => loadi(state, addr),
            JumpOffset { addr } => jumpi(state, addr),
            Random { x, kk } => rnd(state, x, kk, rng),
            Draw { x, y, n } => draw(state, x, y, n),
            SkipIfPressed { x } => skpr(state, x),
            SkipIfNotPressed { x } => skup(state, x),
            LoadDelay { x } => moved(state, x),
            WaitForKey { x } => keyd(state, x),
            SetDelay { x } => loads(state, x),
            SetSound { .. } => state.advance_pc(0x2),
            AddIndex { x } => addi(state, x),
            LoadSprite { x } => ldspr(state, x),
            StoreBcd { x } => bcd(state, x),
            StoreRegisters { x } => stor(state, x),
            LoadRegisters { x } => read(state, x),
        }
        Ok(())
    }
}

/// clear
fn clr(state: &mut State) {
    state.frame_buffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
    state.advance_pc(0x2);
}

/// PC = STACK.pop()
/// The saved address already points past the call, so it is used as is.
/// Returning with nothing on the stack is skipped over.
fn rts(state: &mut State) -> Result<(), Chip8Error> {
    match state.pop() {
        Ok(addr) => {
            state.jump(addr);
            Ok(())
        }
        Err(err) => {
            state.advance_pc(0x2);
            Err(err)
        }
    }
}

/// PC = addr
fn jump(state: &mut State, addr: u16) {
    state.jump(addr);
}

/// STACK.push(PC + 2); PC = addr
/// Calling with a full stack is skipped over.
fn call(state: &mut State, addr: u16) -> Result<(), Chip8Error> {
    let return_addr = state.pc.wrapping_add(0x2) & ADDRESS_MASK;
    match state.push(return_addr) {
        Ok(()) => {
            state.jump(addr);
            Ok(())
        }
        Err(err) => {
            state.advance_pc(0x2);
            Err(err)
        }
    }
}

/// if condition then pc += 4 else pc += 2
fn skip_if(state: &mut State, condition: bool) {
    state.advance_pc(if condition { 0x4 } else { 0x2 });
}

/// if Vx == kk then skip
fn ske(state: &mut State, x: usize, kk: u8) {
    let condition = state.v[x] == kk;
    skip_if(state, condition);
}

/// if Vx != kk then skip
fn skne(state: &mut State, x: usize, kk: u8) {
    let condition = state.v[x] != kk;
    skip_if(state, condition);
}

/// if Vx == Vy then skip
fn skre(state: &mut State, x: usize, y: usize) {
    let condition = state.v[x] == state.v[y];
    skip_if(state, condition);
}

/// if Vx != Vy then skip
fn skrne(state: &mut State, x: usize, y: usize) {
    let condition = state.v[x] != state.v[y];
    skip_if(state, condition);
}

/// Vx = kk
fn load(state: &mut State, x: usize, kk: u8) {
    state.v[x] = kk;
    state.advance_pc(0x2);
}

/// Vx += kk
/// Wraps on overflow without touching VF
fn add(state: &mut State, x: usize, kk: u8) {
    state.v[x] = state.v[x].wrapping_add(kk);
    state.advance_pc(0x2);
}

/// Vx = Vy
fn mv(state: &mut State, x: usize, y: usize) {
    state.v[x] = state.v[y];
    state.advance_pc(0x2);
}

/// Vx |= Vy
fn or(state: &mut State, x: usize, y: usize) {
    state.v[x] |= state.v[y];
    state.advance_pc(0x2);
}

/// Vx &= Vy
fn and(state: &mut State, x: usize, y: usize) {
    state.v[x] &= state.v[y];
    state.advance_pc(0x2);
}

/// Vx ^= Vy
fn xor(state: &mut State, x: usize, y: usize) {
    state.v[x] ^= state.v[y];
    state.advance_pc(0x2);
}

/// Vx += Vy; VF = overflow
fn addv(state: &mut State, x: usize, y: usize) {
    let (res, over) = state.v[x].overflowing_add(state.v[y]);
    state.v[0xF] = u8::from(over);
    state.v[x] = res;
    state.advance_pc(0x2);
}

/// Vx -= Vy; VF = !underflow
fn sub(state: &mut State, x: usize, y: usize) {
    let (res, under) = state.v[x].overflowing_sub(state.v[y]);
    state.v[0xF] = u8::from(!under);
    state.v[x] = res;
    state.advance_pc(0x2);
}

/// Vx >>= 1; VF = shifted out lsb
fn shr(state: &mut State, x: usize) {
    let vx = state.v[x];
    state.v[0xF] = vx & 0x1;
    state.v[x] = vx >> 1;
    state.advance_pc(0x2);
}

/// Vx = Vy - Vx; VF = !underflow
fn subn(state: &mut State, x: usize, y: usize) {
    let (res, under) = state.v[y].overflowing_sub(state.v[x]);
    state.v[0xF] = u8::from(!under);
    state.v[x] = res;
    state.advance_pc(0x2);
}

/// Vx <<= 1; VF = shifted out msb
fn shl(state: &mut State, x: usize) {
    let vx = state.v[x];
    state.v[0xF] = vx >> 7;
    state.v[x] = vx << 1;
    state.advance_pc(0x2);
}

/// I = addr
fn loadi(state: &mut State, addr: u16) {
    state.i = addr;
    state.advance_pc(0x2);
}

/// PC = V0 + addr
fn jumpi(state: &mut State, addr: u16) {
    state.jump(addr + u16::from(state.v[0x0]));
}

/// Vx = rand_byte & kk
fn rnd<R: Rng>(state: &mut State, x: usize, kk: u8, rng: &mut R) {
    let rand_byte: u8 = rng.gen();
    state.v[x] = rand_byte & kk;
    state.advance_pc(0x2);
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
fn draw(state: &mut State, x: usize, y: usize, n: u8) {
    let origin_x = state.v[x] as usize;
    let origin_y = state.v[y] as usize;
    let mut collision = false;

    for row in 0..n as usize {
        let sprite_byte = state.read_byte(state.i.wrapping_add(row as u16));
        let py = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            if sprite_byte & (0x80 >> bit) == 0 {
                continue;
            }
            let px = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = &mut state.frame_buffer[py][px];
            collision |= *pixel;
            *pixel ^= true;
        }
    }

    state.v[0xF] = u8::from(collision);
    state.draw_flag = true;
    state.advance_pc(0x2);
}

/// Vx names a key; anything past 0xF is never pressed
fn is_pressed(state: &State, x: usize) -> bool {
    state
        .pressed_keys
        .get(state.v[x] as usize)
        .copied()
        .unwrap_or(false)
}

/// if Vx.pressed then skip
fn skpr(state: &mut State, x: usize) {
    let condition = is_pressed(state, x);
    skip_if(state, condition);
}

/// if !Vx.pressed then skip
fn skup(state: &mut State, x: usize) {
    let condition = !is_pressed(state, x);
    skip_if(state, condition);
}

/// Vx = DT
fn moved(state: &mut State, x: usize) {
    state.v[x] = state.delay_timer;
    state.advance_pc(0x2);
}

/// await keypress for Vx
/// The pc stays put until a key is down, so the same instruction runs again next step
fn keyd(state: &mut State, x: usize) {
    if let Some(key) = state.pressed_keys.iter().position(|&pressed| pressed) {
        state.v[x] = key as u8;
        state.advance_pc(0x2);
    }
}

/// DT = Vx
fn loads(state: &mut State, x: usize) {
    state.delay_timer = state.v[x];
    state.advance_pc(0x2);
}

/// I += Vx; VF = I overflowed the address space
fn addi(state: &mut State, x: usize) {
    let sum = u32::from(state.i) + u32::from(state.v[x]);
    state.v[0xF] = u8::from(sum > u32::from(ADDRESS_MASK));
    state.i = sum as u16;
    state.advance_pc(0x2);
}

/// I = address of the glyph for the low nibble of Vx
fn ldspr(state: &mut State, x: usize) {
    state.i = FONT_START + u16::from(state.v[x] & 0xF) * FONT_GLYPH_SIZE;
    state.advance_pc(0x2);
}

/// mem[I..I+3] = bcd(Vx)
fn bcd(state: &mut State, x: usize) {
    let vx = state.v[x];
    let i = state.i;
    state.write_byte(i, vx / 100);
    state.write_byte(i.wrapping_add(1), vx / 10 % 10);
    state.write_byte(i.wrapping_add(2), vx % 10);
    state.advance_pc(0x2);
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
fn stor(state: &mut State, x: usize) {
    for register in 0..=x {
        let value = state.v[register];
        state.write_byte(state.i.wrapping_add(register as u16), value);
    }
    state.i = state.i.wrapping_add(x as u16 + 1);
    state.advance_pc(0x2);
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
fn read(state: &mut State, x: usize) {
    for register in 0..=x {
        state.v[register] = state.read_byte(state.i.wrapping_add(register as u16));
    }
    state.i = state.i.wrapping_add(x as u16 + 1);
    state.advance_pc(0x2);
}
