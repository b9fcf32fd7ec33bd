//! Shared fixtures for tests across the workspace
//!
//!     Tests should use these sources rather than inventing Java inline, so that a change in
//!     what the parser accepts is fixed in one place. Enabled in dependent crates with the
//!     `test-support` feature.

/// One class `Foo` with one method `bar` and one field `x`
pub const FOO_BAR_X: &str = "class Foo {\n    void bar() {}\n    int x;\n}\n";

/// A field and a local sharing the name `bar`, plus a use of it
pub const SHADOWED_BAR: &str = "\
class Counter {
    int bar = 0;

    void tick() {
        int bar = 1;
        System.out.println(bar);
    }
}
";

/// A file with every declaration flavor the parser reports
pub const SHAPES: &str = "\
package demo.shapes;

import java.util.List;
import java.util.Map;
import java.util.*;

public interface Shape {
    double area();
}

public record Circle(double radius) implements Shape {
    public double area() {
        return Math.PI * radius * radius;
    }
}

enum Kind { ROUND, SQUARE }

@interface Tagged {
    String value() default \"\";
}

public class Canvas {
    private final List<Shape> shapes;

    public Canvas(List<Shape> shapes) {
        this.shapes = shapes;
    }

    double total() {
        double sum = 0;
        for (Shape shape : shapes) {
            sum += shape.area();
        }
        try {
            return sum;
        } catch (IllegalStateException e) {
            return 0;
        }
    }
}
";

/// Unclosed method and class bodies
pub const UNCLOSED: &str = "class Broken {\n    void f() {\n        int y = 1;\n";

/// Byte offset of the `nth` (zero-based) occurrence of `needle` in `source`
pub fn offset_of_nth(source: &str, needle: &str, nth: usize) -> usize {
    source
        .match_indices(needle)
        .nth(nth)
        .map(|(offset, _)| offset)
        .unwrap_or_else(|| panic!("{needle:?} occurs fewer than {} times", nth + 1))
}
