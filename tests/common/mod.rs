//! Hand-assembled ELF byte images for the integration tests.
//!
//! Everything is written out field by field so the tests pin the exact
//! wire layout rather than trusting the crate under test to generate its
//! own inputs.

#![allow(dead_code)]

/// Byte-order-aware output buffer for building fixtures.
pub struct W {
    pub out: Vec<u8>,
    big_endian: bool,
}

impl W {
    pub fn le() -> Self {
        W {
            out: Vec::new(),
            big_endian: false,
        }
    }

    pub fn be() -> Self {
        W {
            out: Vec::new(),
            big_endian: true,
        }
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.out.push(v);
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        if self.big_endian {
            self.out.extend_from_slice(&v.to_be_bytes());
        } else {
            self.out.extend_from_slice(&v.to_le_bytes());
        }
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        if self.big_endian {
            self.out.extend_from_slice(&v.to_be_bytes());
        } else {
            self.out.extend_from_slice(&v.to_le_bytes());
        }
        self
    }

    pub fn u64(&mut self, v: u64) -> &mut Self {
        if self.big_endian {
            self.out.extend_from_slice(&v.to_be_bytes());
        } else {
            self.out.extend_from_slice(&v.to_le_bytes());
        }
        self
    }

    pub fn bytes(&mut self, b: &[u8]) -> &mut Self {
        self.out.extend_from_slice(b);
        self
    }

    pub fn zeros(&mut self, n: usize) -> &mut Self {
        self.out.resize(self.out.len() + n, 0);
        self
    }
}

pub struct Ehdr {
    pub class: u8,
    pub data: u8,
    pub kind: u16,
    pub machine: u16,
    pub entry: u64,
    pub phoff: u64,
    pub shoff: u64,
    pub phentsize: u16,
    pub phnum: u16,
    pub shentsize: u16,
    pub shnum: u16,
    pub shstrndx: u16,
}

impl Ehdr {
    pub fn rel32(shoff: u64, shnum: u16, shstrndx: u16) -> Self {
        Ehdr {
            class: 1,
            data: 1,
            kind: 1, // ET_REL
            machine: 3,
            entry: 0,
            phoff: 0,
            shoff,
            phentsize: 32,
            phnum: 0,
            shentsize: 40,
            shnum,
            shstrndx,
        }
    }

    /// Writes the header at the current position (which must be 0).
    pub fn emit(&self, w: &mut W) {
        assert!(w.out.is_empty(), "the ELF header must come first");
        w.bytes(&[0x7f, b'E', b'L', b'F']);
        w.u8(self.class).u8(self.data).u8(1); // class, data, version
        w.u8(0).u8(0); // OS/ABI, ABI version
        w.zeros(7);
        w.u16(self.kind).u16(self.machine).u32(1);
        if self.class == 1 {
            w.u32(self.entry as u32)
                .u32(self.phoff as u32)
                .u32(self.shoff as u32);
        } else {
            w.u64(self.entry).u64(self.phoff).u64(self.shoff);
        }
        w.u32(0); // e_flags
        let ehsize = if self.class == 1 { 52 } else { 64 };
        w.u16(ehsize)
            .u16(self.phentsize)
            .u16(self.phnum)
            .u16(self.shentsize)
            .u16(self.shnum)
            .u16(self.shstrndx);
        assert_eq!(w.out.len(), usize::from(ehsize));
    }
}

#[derive(Clone, Copy, Default)]
pub struct Shdr {
    pub name: u32,
    pub kind: u32,
    pub flags: u64,
    pub addr: u64,
    pub offset: u64,
    pub size: u64,
    pub link: u32,
    pub info: u32,
    pub addralign: u64,
    pub entsize: u64,
}

impl Shdr {
    pub fn emit32(&self, w: &mut W) {
        w.u32(self.name)
            .u32(self.kind)
            .u32(self.flags as u32)
            .u32(self.addr as u32)
            .u32(self.offset as u32)
            .u32(self.size as u32)
            .u32(self.link)
            .u32(self.info)
            .u32(self.addralign as u32)
            .u32(self.entsize as u32);
    }

    pub fn emit64(&self, w: &mut W) {
        w.u32(self.name)
            .u32(self.kind)
            .u64(self.flags)
            .u64(self.addr)
            .u64(self.offset)
            .u64(self.size)
            .u32(self.link)
            .u32(self.info)
            .u64(self.addralign)
            .u64(self.entsize);
    }
}

/// The byte image of scenario "minimal relocatable file": header, a null
/// section and `.shstrtab`, nothing else.
pub fn minimal_rel32(big_endian: bool) -> Vec<u8> {
    let names = b"\0.shstrtab\0";
    let shoff = 52 + names.len() as u64;
    let mut w = if big_endian { W::be() } else { W::le() };
    let mut ehdr = Ehdr::rel32(shoff, 2, 1);
    if big_endian {
        ehdr.data = 2;
    }
    ehdr.emit(&mut w);
    w.bytes(names);
    Shdr::default().emit32(&mut w);
    Shdr {
        name: 1,
        kind: 3, // SHT_STRTAB
        offset: 52,
        size: names.len() as u64,
        addralign: 1,
        ..Shdr::default()
    }
    .emit32(&mut w);
    w.out
}

/// A 32-bit relocatable file with `.text` and `.data` sections:
///
/// ```text
/// 0    52      64      80      88          111
/// ehdr | pad   | .text | .data | .shstrtab | shdrs (4 entries)
/// ```
pub fn two_section_rel32() -> Vec<u8> {
    // Name pool as the suffix-compressed builder will regenerate it.
    let names = b"\0.data\0.shstrtab\0.text\0";
    let (name_data, name_shstrtab, name_text) = (1, 7, 17);
    let mut w = W::le();
    Ehdr::rel32(111, 4, 3).emit(&mut w);
    w.zeros(12); // pad to the .text alignment
    w.bytes(&[0x90; 16]); // .text
    w.bytes(&[0xaa; 8]); // .data
    w.bytes(names);
    assert_eq!(w.out.len(), 111);
    Shdr::default().emit32(&mut w);
    Shdr {
        name: name_text,
        kind: 1,        // SHT_PROGBITS
        flags: 0x2 | 0x4, // ALLOC | EXECINSTR
        offset: 64,
        size: 16,
        addralign: 16,
        ..Shdr::default()
    }
    .emit32(&mut w);
    Shdr {
        name: name_data,
        kind: 1,
        flags: 0x2 | 0x1, // ALLOC | WRITE
        offset: 80,
        size: 8,
        addralign: 4,
        ..Shdr::default()
    }
    .emit32(&mut w);
    Shdr {
        name: name_shstrtab,
        kind: 3,
        offset: 88,
        size: names.len() as u64,
        addralign: 1,
        ..Shdr::default()
    }
    .emit32(&mut w);
    w.out
}
