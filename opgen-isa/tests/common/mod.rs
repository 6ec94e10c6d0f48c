use opgen_isa::Catalog;

pub const SAMPLE_CATALOG: &str = r#"
default:
  - "throw CompilerDirectives.shouldNotReachHere(\"invalid opcode\");"
opcodes:
  - name: pop
    id: 1
    execute: ["sp = sp - 1;"]
  - name: loadConstant
    id: 2
    length: 4
    results: [object]
    execute: ["frame.setObject(sp, consts[LE_BYTES.getShort(bc, bci + 2)]);", "sp = sp + 1;"]
  - name: branchFalse
    id: 3
    length: 4
    flags: [branch]
  - name: traceStatement
    id: 4
    flags: [instrumentation_only]
    execute: ["probe.onStatement(bci);"]
  - name: return
    id: 5
    flags: [return]
    results: [object, int]
"#;

pub fn sample() -> Catalog {
    Catalog::from_yaml_str(SAMPLE_CATALOG).unwrap()
}
